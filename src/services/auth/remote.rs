//! Remote identity provider: delegates token checks to a verification endpoint.
//!
//! Contract: `POST <verify_url>` with `{"token": "<token>"}`, answered by
//! `{"valid": bool, "claims": {...}}`. Anything other than a clear answer is
//! reported as `Unavailable` so the middleware fails closed.
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::services::auth::identity::{
    IdentityError, IdentityProvider, VerifiedIdentity, identity_from_claims,
};

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    valid: bool,
    #[serde(default)]
    claims: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct RemoteIdentityProvider {
    verify_url: Url,
    client: reqwest::Client,
}

impl RemoteIdentityProvider {
    pub fn new(verify_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { verify_url, client })
    }
}

#[async_trait]
impl IdentityProvider for RemoteIdentityProvider {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let response = self
            .client
            .post(self.verify_url.clone())
            .json(&VerifyRequest { token })
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(IdentityError::Rejected(format!("provider answered {status}")));
        }
        if !status.is_success() {
            return Err(IdentityError::Unavailable(format!(
                "unexpected status {status}"
            )));
        }

        let body = response
            .json::<VerifyResponse>()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        if !body.valid {
            return Err(IdentityError::Rejected("provider marked token invalid".to_string()));
        }

        let claims = body.claims.unwrap_or(serde_json::Value::Null);
        identity_from_claims(claims)
            .ok_or_else(|| IdentityError::Rejected("missing subject in claims".to_string()))
    }
}
