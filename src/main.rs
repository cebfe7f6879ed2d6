use std::sync::Arc;

use planet_saver_backend::api::{self, AppState};
use planet_saver_backend::config::Config;
use planet_saver_backend::evaluator::ActionEvaluator;
use planet_saver_backend::fallback::FallbackEvaluator;
use planet_saver_backend::llm::{GeminiClient, LlmClient, OpenRouterClient};
use planet_saver_backend::metrics;
use planet_saver_backend::narrative::OpeningNarrator;

#[tokio::main]
async fn main() {
    // A missing .env file is normal outside local development.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = Config::load();
    metrics::register_metrics();

    let gemini: Arc<dyn LlmClient> = Arc::new(
        GeminiClient::new(
            config.gemini_key.clone(),
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
            None,
        )
        .expect("Failed to build Gemini client"),
    );

    let mut evaluator = ActionEvaluator::new(gemini.clone(), config.rubric);
    if config.fallback_enabled {
        let openrouter = OpenRouterClient::new(
            config.openrouter_api_key.clone(),
            config.openrouter_model.clone(),
            config.openrouter_base_url.clone(),
            config.openrouter_timeout,
        )
        .expect("Failed to build OpenRouter client");
        evaluator = evaluator.with_fallback(FallbackEvaluator::new(Arc::new(openrouter)));
        tracing::info!(model = %config.openrouter_model, "Fallback evaluator enabled");
    }
    let narrator = OpeningNarrator::new(gemini);

    if std::env::var(planet_saver_backend::config::GEMINI_API_KEY_VAR).is_err() {
        tracing::warn!("GEMINI_API_KEY is not set; provider calls will fail until it is");
    }

    let state = AppState::new(evaluator, narrator);
    let app = api::app(state, config.static_dir.clone());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to {addr}: {e}"));

    tracing::info!(
        rubric = ?config.rubric,
        model = %config.gemini_model,
        "Planet Saver backend listening on {addr}"
    );
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
