/*
 * Responsibility
 * - GET /auth/me: 認証済みユーザー情報を返す (認証必須)
 */
use axum::Json;

use crate::api::v1::extractors::{AuthCtxExtractor, AuthenticatedUser};

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<AuthenticatedUser> {
    Json(ctx.user)
}
