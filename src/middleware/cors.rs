//! CORS policy for browser clients.
//!
//! Note:
//! - CORS is enforced by browsers. Service-to-service calls (the itinerary
//!   service, the API gateway) are not restricted by it.
//! - Preflight (`OPTIONS`) requests are answered here and are never
//!   authenticated.
//!
//! Policy:
//! - Development: permissive (Allow-Origin: *), WITHOUT credentials.
//! - Production: allowlist origins from Config (comma-separated env var), WITHOUT credentials.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;

/// Apply CORS policy to the given Router.
///
/// IMPORTANT:
/// - Do not combine wildcard origin (`Any`) with `allow_credentials(true)`.
pub fn apply(router: Router, config: &Config) -> Router {
    let cors = if config.app_env.is_production() {
        // Empty allowlist allows none (no CORS headers).
        let allowed: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        let allow_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _req| {
            allowed.iter().any(|v| v == origin)
        });

        CorsLayer::new().allow_origin(allow_origin)
    } else {
        CorsLayer::new().allow_origin(Any)
    }
    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
    .allow_headers(allowed_headers(config))
    .max_age(std::time::Duration::from_secs(60 * 10));

    router.layer(cors)
}

fn allowed_headers(config: &Config) -> Vec<HeaderName> {
    let mut headers = vec![
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::ACCEPT,
        HeaderName::from_static("x-request-id"),
    ];

    let credential = &config.credential_headers;
    for name in std::iter::once(&credential.primary).chain(credential.fallback.iter()) {
        if !headers.contains(name) {
            headers.push(name.clone());
        }
    }

    headers
}
