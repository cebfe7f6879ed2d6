// Prometheus metrics definitions for the Planet Saver backend.

use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // ── Counters ─────────────────────────────────────────────────────

    /// Provider calls, by provider and outcome (`ok` or an error kind).
    pub static ref LLM_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("planet_saver_llm_requests_total", "Total LLM provider calls"),
        &["provider", "outcome"],
    )
    .unwrap();

    /// Actions scored, whichever provider answered.
    pub static ref ACTIONS_EVALUATED_TOTAL: IntCounter = IntCounter::new(
        "planet_saver_actions_evaluated_total",
        "Player actions evaluated",
    )
    .unwrap();

    /// Model replies that were not valid JSON and fell back to a zero score.
    pub static ref EVALUATION_PARSE_FALLBACKS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "planet_saver_evaluation_parse_fallbacks_total",
            "Model replies that could not be decoded as an evaluation",
        ),
        &["provider"],
    )
    .unwrap();

    /// Evaluations routed to the fallback provider.
    pub static ref FALLBACK_EVALUATIONS_TOTAL: IntCounter = IntCounter::new(
        "planet_saver_fallback_evaluations_total",
        "Evaluations served by the fallback provider",
    )
    .unwrap();

    pub static ref OPENINGS_GENERATED_TOTAL: IntCounter = IntCounter::new(
        "planet_saver_openings_generated_total",
        "Opening narratives generated",
    )
    .unwrap();

    /// Total API requests, by endpoint/status.
    pub static ref API_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("planet_saver_api_requests_total", "Total API requests"),
        &["endpoint", "status"],
    )
    .unwrap();

    // ── Histograms ───────────────────────────────────────────────────

    /// Provider call latency in seconds.
    pub static ref LLM_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "planet_saver_llm_request_duration_seconds",
            "LLM provider call duration in seconds",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]),
        &["provider"],
    )
    .unwrap();

    /// Distribution of awarded scores.
    pub static ref ACTION_SCORE: Histogram = Histogram::with_opts(
        HistogramOpts::new("planet_saver_action_score", "Scores awarded to player actions")
            .buckets(vec![-40.0, -20.0, -5.0, 5.0, 20.0, 40.0, 50.0]),
    )
    .unwrap();
}

/// Register all metrics with the custom registry. Call once at startup.
pub fn register_metrics() {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(LLM_REQUESTS_TOTAL.clone()),
        Box::new(ACTIONS_EVALUATED_TOTAL.clone()),
        Box::new(EVALUATION_PARSE_FALLBACKS_TOTAL.clone()),
        Box::new(FALLBACK_EVALUATIONS_TOTAL.clone()),
        Box::new(OPENINGS_GENERATED_TOTAL.clone()),
        Box::new(API_REQUESTS_TOTAL.clone()),
        Box::new(LLM_REQUEST_DURATION_SECONDS.clone()),
        Box::new(ACTION_SCORE.clone()),
    ];

    for c in collectors {
        // Already registered (e.g. by a second router in tests) is fine.
        if let Err(e) = REGISTRY.register(c) {
            tracing::debug!("metric registration skipped: {e}");
        }
    }
}

/// Serialize all registered metrics to the Prometheus text exposition format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {e}");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
