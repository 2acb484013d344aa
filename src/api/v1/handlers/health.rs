/*
 * Responsibility
 * - GET /health (疎通用)
 * - 公開エンドポイント: 認証 middleware を通さない
 */
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "identityProvider": state.identity.name(),
        })),
    )
}
