use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::services::auth::CredentialContext;
use crate::state::AppState;

/// Hands the request's `CredentialContext` to a handler.
///
/// Never rejects: on routes without the authentication middleware the context
/// is simply empty, and outbound calls go out without `Authorization`.
pub struct Credential(pub CredentialContext);

impl FromRequestParts<AppState> for Credential
where
    AppState: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<CredentialContext>()
            .cloned()
            .unwrap_or_else(CredentialContext::empty);

        Ok(Credential(ctx))
    }
}
