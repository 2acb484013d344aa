/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 公開ルートと認証必須ルートを分け、認証必須側にだけ authenticated middleware を掛ける
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{
    auth::me,
    feed::{personalized_feed, popular_feed},
    health::health,
};
use crate::middleware::auth::authenticated;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    public_routes().merge(authenticated::apply(protected_routes(), state))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/feed/popular", get(popular_feed))
}

fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(me))
        .route("/feed", get(personalized_feed))
}
