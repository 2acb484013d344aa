//! Identity provider interface used by the authentication middleware.
use async_trait::async_trait;
use thiserror::Error;

/// Identity information the provider vouched for.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedIdentity {
    pub uid: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub email_verified: bool,
    /// All claims as returned by the provider.
    pub claims: serde_json::Value,
}

/// Provider-level failures.
///
/// Both variants are authentication failures for the caller (fail-closed);
/// the split exists for logging only.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("token rejected: {0}")]
    Rejected(String),
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Validates a bearer token (without the `Bearer ` prefix).
///
/// Implementations must be stateless with respect to a given token:
/// verifying the same token twice yields the same decision as long as the
/// provider's own state did not change.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    // Provider name (for logging).
    fn name(&self) -> &'static str;

    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityError>;
}

/// Build a `VerifiedIdentity` from a Firebase / Identity Platform style claim set.
///
/// Returns `None` when no usable subject is present.
pub(crate) fn identity_from_claims(claims: serde_json::Value) -> Option<VerifiedIdentity> {
    let uid = claims
        .get("sub")
        .or_else(|| claims.get("user_id"))
        .or_else(|| claims.get("uid"))
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();

    let string_claim = |key: &str| {
        claims
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };

    let email = string_claim("email");
    let name = string_claim("name");
    let email_verified = claims
        .get("email_verified")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    Some(VerifiedIdentity {
        uid,
        email,
        name,
        email_verified,
        claims,
    })
}
