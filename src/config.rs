// Application configuration, loaded from environment variables and CLI flags.

use std::path::PathBuf;
use std::time::Duration;

use crate::llm::ApiKeySource;
use crate::prompts::Rubric;

/// Environment variable holding the primary (Gemini) credential.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Environment variable holding the fallback (OpenRouter) credential.
pub const OPENROUTER_API_KEY_VAR: &str = "OPENROUTER_API_KEY";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_OPENROUTER_MODEL: &str = "meta-llama/llama-3.1-8b-instruct:free";
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_OPENROUTER_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Where the primary credential comes from. Resolved on every call.
    pub gemini_key: ApiKeySource,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// Fallback credential, captured once here.
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: String,
    pub openrouter_base_url: String,
    pub openrouter_timeout: Duration,
    /// Scoring rubric variant used by the action evaluator.
    pub rubric: Rubric,
    /// Whether the action evaluator degrades to the fallback provider.
    pub fallback_enabled: bool,
    /// Directory containing the pre-built front-end to serve.
    pub static_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables and CLI arguments.
    ///
    /// Environment variables:
    /// - `PORT` - HTTP server port (default: 5000)
    /// - `GEMINI_API_KEY` - primary credential, read per request
    /// - `GEMINI_MODEL`, `GEMINI_BASE_URL`
    /// - `OPENROUTER_API_KEY` - fallback credential
    /// - `OPENROUTER_MODEL`, `OPENROUTER_BASE_URL`, `OPENROUTER_TIMEOUT_SECS`
    /// - `PLANET_SAVER_RUBRIC` - `standard` (default) or `follow-up`
    /// - `PLANET_SAVER_FALLBACK` - `true`/`false`; defaults to whether
    ///   `OPENROUTER_API_KEY` is set
    /// - `STATIC_DIR` - Path to frontend dist directory for static file serving
    ///
    /// CLI flags:
    /// - `--port <PORT>` - Override the port
    pub fn load() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self::from_parts(&args, |key| std::env::var(key).ok())
    }

    /// Build a config from CLI args and an environment lookup.
    pub fn from_parts<F>(args: &[String], env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Port: CLI flag --port takes precedence, then env var, then default
        let port = Self::parse_cli_value(args, "--port")
            .and_then(|v| v.parse().ok())
            .or_else(|| env("PORT").and_then(|v| v.parse().ok()))
            .unwrap_or(5000);

        let openrouter_api_key = env(OPENROUTER_API_KEY_VAR).filter(|k| !k.trim().is_empty());

        let rubric = match env("PLANET_SAVER_RUBRIC") {
            Some(v) => v.parse::<Rubric>().unwrap_or_else(|e| {
                tracing::warn!("{e}; using the standard rubric");
                Rubric::Standard
            }),
            None => Rubric::Standard,
        };

        let fallback_enabled = env("PLANET_SAVER_FALLBACK")
            .map(|v| parse_bool(&v))
            .unwrap_or(openrouter_api_key.is_some());

        let openrouter_timeout = env("OPENROUTER_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_OPENROUTER_TIMEOUT_SECS));

        Config {
            port,
            gemini_key: ApiKeySource::Env(GEMINI_API_KEY_VAR.to_string()),
            gemini_model: env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: env("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            openrouter_api_key,
            openrouter_model: env("OPENROUTER_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENROUTER_MODEL.to_string()),
            openrouter_base_url: env("OPENROUTER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENROUTER_BASE_URL.to_string()),
            openrouter_timeout,
            rubric,
            fallback_enabled,
            static_dir: env("STATIC_DIR").map(PathBuf::from),
        }
    }

    /// Parse a CLI flag value like `--port 8080`.
    fn parse_cli_value(args: &[String], flag: &str) -> Option<String> {
        args.windows(2).find_map(|pair| {
            if pair[0] == flag {
                Some(pair[1].clone())
            } else {
                None
            }
        })
    }
}

fn parse_bool(v: &str) -> bool {
    v.eq_ignore_ascii_case("true") || v == "1"
}
