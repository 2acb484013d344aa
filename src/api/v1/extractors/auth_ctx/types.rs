/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - トークン検証は middleware/services 側の責務
 * - 生の credential はここに持たない (CredentialContext 側)
 */
use serde::Serialize;

use crate::services::auth::VerifiedIdentity;

/// User information taken from the identity provider's claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub uid: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub email_verified: bool,
}

impl From<VerifiedIdentity> for AuthenticatedUser {
    fn from(identity: VerifiedIdentity) -> Self {
        Self {
            uid: identity.uid,
            email: identity.email,
            name: identity.name,
            email_verified: identity.email_verified,
        }
    }
}

/// 認証済みのリクエストに付与されるコンテキスト
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub user: AuthenticatedUser,
}

impl AuthCtx {
    pub fn new(user: AuthenticatedUser) -> Self {
        Self { user }
    }

    pub fn uid(&self) -> &str {
        &self.user.uid
    }
}
