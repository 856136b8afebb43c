use crate::state::AppState;
use axum::http::{HeaderValue, Method, header};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// CORS layer applied to the whole router, so every response – success,
/// guard failure, and the `OPTIONS` preflight – carries the same headers.
///
/// Methods and headers are fixed by the wire contract (`POST, OPTIONS` /
/// `Content-Type, Authorization`); the origin defaults to wildcard and can
/// be narrowed with `PREPCOACH_CORS_ORIGINS`.
pub fn cors_layer(state: Arc<AppState>) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if let Some(origins_str) = &state.config.cors_allowed_origins {
        // Parse the comma-separated origin list and build a restrictive layer.
        let origins: Vec<HeaderValue> = origins_str
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        if origins.is_empty() {
            base.allow_origin(Any)
        } else {
            base.allow_origin(origins)
        }
    } else {
        // Wildcard – matches the public single-page-app deployment.
        base.allow_origin(Any)
    }
}
