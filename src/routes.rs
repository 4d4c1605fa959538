use axum::{extract::Request, http::HeaderValue, routing::get, Router};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Level;

use crate::config::CorsConfig;
use crate::handlers::usage::{get_daily_mean, get_stat, health, list_records};
use crate::services::UsageService;

pub fn create_router(service: UsageService, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/records", get(list_records))
        .route("/stats", get(get_stat))
        .route("/stats/daily", get(get_daily_mean))
        .with_state(service)
        .layer(cors_layer(cors))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    tracing::span!(
                        Level::INFO,
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_request(|_request: &Request, _span: &tracing::Span| {
                    tracing::event!(Level::DEBUG, "received request");
                })
                .on_response(
                    |_response: &axum::response::Response,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::event!(Level::INFO, latency = ?latency, "request completed");
                    },
                ),
        )
}

/// Credentialed CORS for the configured origins, or a permissive policy when
/// none are configured.
fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    // A wildcard cannot be combined with credentials or an explicit list.
    if cors.allowed_origins.iter().any(|origin| origin.trim() == "*") {
        tracing::warn!("wildcard CORS origin configured, allowing any origin without credentials");
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
