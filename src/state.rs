/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - identity: IdentityProvider, itineraries: ItineraryClient, credential_headers
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - リクエスト単位の情報 (CredentialContext) はここに置かない。request extensions に載せる
 */
use std::sync::Arc;
use std::time::Duration;

use crate::config::CredentialHeaders;
use crate::middleware::auth::authenticated::DEFAULT_VERIFY_TIMEOUT;
use crate::services::{auth::IdentityProvider, itinerary::ItineraryClient};

#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub itineraries: Arc<dyn ItineraryClient>,
    pub credential_headers: Arc<CredentialHeaders>,
    /// Deadline for a single token verification inside the auth middleware.
    pub verify_timeout: Duration,
}

impl AppState {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        itineraries: Arc<dyn ItineraryClient>,
        credential_headers: CredentialHeaders,
    ) -> Self {
        Self {
            identity,
            itineraries,
            credential_headers: Arc::new(credential_headers),
            verify_timeout: DEFAULT_VERIFY_TIMEOUT,
        }
    }

    pub fn with_verify_timeout(mut self, timeout: Duration) -> Self {
        self.verify_timeout = timeout;
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("identity", &self.identity.name())
            .field("credential_headers", &self.credential_headers)
            .field("verify_timeout", &self.verify_timeout)
            .finish()
    }
}
