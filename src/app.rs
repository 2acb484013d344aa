/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → 依存生成 (IdentityProvider, ItineraryClient) → Router 組み立て
 * - Middleware の適用 (HTTP 共通 / CORS / 認証)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware,
    services::{auth::build_identity_provider, itinerary::HttpItineraryClient},
    state::AppState,
};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,recommendation_gateway=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Surface panics via tracing so they don't get lost.
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        // Production: CatchPanicLayer answers 500 and the server keeps running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting recommendation gateway in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_state(config: &Config) -> Result<AppState> {
    let identity = build_identity_provider(config)?;

    let itineraries =
        HttpItineraryClient::new(&config.itinerary_service_url, config.itinerary_timeout)
            .context("failed to build itinerary service client")?;

    tracing::info!(
        itinerary_service = %config.itinerary_service_url,
        primary_header = %config.credential_headers.primary,
        "outbound clients configured"
    );

    Ok(AppState::new(
        identity,
        Arc::new(itineraries),
        config.credential_headers.clone(),
    ))
}

/// Full router as served: application routes + HTTP middleware + CORS.
pub fn build_router(state: AppState, config: &Config) -> Router {
    middleware::cors::apply(app_router(state), config)
}

/// Application routes with the HTTP-level middleware, without CORS.
pub fn app_router(state: AppState) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    middleware::http::apply(router)
}
