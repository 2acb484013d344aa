//! Per-request credential context.
//!
//! The authentication middleware stores the caller's raw credential header here
//! after the identity provider accepted it. Outbound clients read it to forward
//! the same value to other internal services.
//!
//! The value travels in the request's extensions, so every request owns its
//! own instance and nothing is shared across requests.

use std::fmt;

use axum::http::{HeaderValue, header};

#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialContext {
    authorization: Option<HeaderValue>,
}

impl CredentialContext {
    /// Context for requests that did not go through authentication.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Context holding a credential the identity provider accepted.
    ///
    /// `raw` is the header value exactly as received, scheme prefix included.
    pub fn verified(raw: HeaderValue) -> Self {
        Self {
            authorization: Some(raw),
        }
    }

    pub fn authorization(&self) -> Option<&HeaderValue> {
        self.authorization.as_ref()
    }

    pub fn is_present(&self) -> bool {
        self.authorization.is_some()
    }

    /// Attach `Authorization: <raw>` to an outbound request when a credential is held.
    ///
    /// No refresh, no re-minting: downstream services see the caller's original token.
    pub fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.authorization {
            Some(raw) => builder.header(header::AUTHORIZATION, raw.clone()),
            None => builder,
        }
    }
}

impl fmt::Debug for CredentialContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the credential itself
        f.debug_struct("CredentialContext")
            .field("present", &self.is_present())
            .finish()
    }
}
