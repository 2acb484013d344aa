//! Bearer token 検証 → CredentialContext / AuthCtx を extensions に入れる
//!
//! - `apply` で登録した Router のルートだけが「認証必須」になる (route_layer)
//! - 検証は IdentityProvider に委譲する
//! - 失敗理由は warn ログにだけ残し、クライアントには一律 401 を返す
//! - IdP に到達できない / 応答しない場合も 401 (fail-closed)

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Method, Request},
    middleware::{self, Next},
    response::Response,
};
use thiserror::Error;

use crate::api::v1::extractors::{AuthCtx, AuthenticatedUser};
use crate::config::CredentialHeaders;
use crate::error::AppError;
use crate::services::auth::{CredentialContext, IdentityError, VerifiedIdentity};
use crate::state::AppState;

const BEARER_SCHEME: &str = "bearer";

/// Verification deadline. Kept below the global request timeout so a hanging
/// provider ends as 401, not 408.
pub const DEFAULT_VERIFY_TIMEOUT: Duration = Duration::from_secs(25);

/// Why a request to a protected route was turned away.
///
/// Logged only; every variant becomes the same 401 response.
#[derive(Debug, Error)]
pub enum AuthFailure {
    #[error("missing credential")]
    MissingCredential,
    #[error("malformed credential")]
    MalformedCredential,
    #[error("credential rejected: {0}")]
    RejectedCredential(String),
    #[error("identity provider unavailable: {0}")]
    IdentityProviderUnavailable(String),
}

impl From<IdentityError> for AuthFailure {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::Rejected(reason) => Self::RejectedCredential(reason),
            IdentityError::Unavailable(reason) => Self::IdentityProviderUnavailable(reason),
        }
    }
}

/// Router に認証を掛ける。
///
/// 例：
/// ```ignore
/// let protected = middleware::auth::authenticated::apply(protected_routes(), state.clone());
/// let v1 = public_routes().merge(protected);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // route_layer: マッチしたルートにだけ適用 (存在しないパスは 401 ではなく 404 のまま)
    router.route_layer(middleware::from_fn_with_state(state, authenticated_middleware))
}

async fn authenticated_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // CORS preflight は認証しない
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let (raw, identity) = match authenticate(&state, req.headers()).await {
        Ok(v) => v,
        Err(failure) => {
            tracing::warn!(reason = %failure, "authentication failed");
            return Err(AppError::Unauthorized);
        }
    };

    tracing::debug!(uid = %identity.uid, "request authenticated");

    // middleware → extractor への受け渡し (handler より前に一度だけ)
    let extensions = req.extensions_mut();
    extensions.insert(CredentialContext::verified(raw));
    extensions.insert(AuthCtx::new(AuthenticatedUser::from(identity)));

    Ok(next.run(req).await)
}

/// Locate, parse and verify the caller's credential.
///
/// Returns the raw header value exactly as received together with the verified identity.
async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<(HeaderValue, VerifiedIdentity), AuthFailure> {
    let raw = credential_header(headers, &state.credential_headers)
        .ok_or(AuthFailure::MissingCredential)?;

    let token = bearer_token(raw)?;
    let identity = tokio::time::timeout(state.verify_timeout, state.identity.verify(token))
        .await
        .map_err(|_| AuthFailure::IdentityProviderUnavailable("verification timed out".into()))??;

    Ok((raw.clone(), identity))
}

/// Primary header first, then the fallback. Empty values count as absent.
fn credential_header<'a>(
    headers: &'a HeaderMap,
    names: &CredentialHeaders,
) -> Option<&'a HeaderValue> {
    let non_empty = |v: &&HeaderValue| !v.as_bytes().iter().all(u8::is_ascii_whitespace);

    headers
        .get(&names.primary)
        .filter(non_empty)
        .or_else(|| {
            names
                .fallback
                .as_ref()
                .and_then(|name| headers.get(name))
                .filter(non_empty)
        })
}

/// `Bearer <token>` → `<token>`. The scheme is matched case-insensitively.
fn bearer_token(raw: &HeaderValue) -> Result<&str, AuthFailure> {
    let value = raw.to_str().map_err(|_| AuthFailure::MalformedCredential)?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or(AuthFailure::MalformedCredential)?;

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(AuthFailure::MalformedCredential);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthFailure::MalformedCredential);
    }

    Ok(token)
}
