use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::services::auth::CredentialContext;
use crate::services::itinerary::client::{Itinerary, ItineraryClient, ItineraryClientError};

/// Bytes of a non-2xx response body kept for diagnostics.
const MAX_ERROR_BODY_BYTES: usize = 512;

/// reqwest-backed itinerary client.
#[derive(Debug, Clone)]
pub struct HttpItineraryClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpItineraryClient {
    /// `base_url`: itinerary service root (e.g. `http://itinerary-service:8080`)
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl ItineraryClient for HttpItineraryClient {
    async fn get_itineraries_by_ids(
        &self,
        credential: &CredentialContext,
        ids: &[i64],
    ) -> Result<Vec<Itinerary>, ItineraryClientError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        if !credential.is_present() {
            tracing::debug!("no credential to forward to itinerary service");
        }

        let url = format!("{}/itinerary/by-ids", self.base_url);
        let request = credential.apply(self.client.post(&url).json(ids));

        let mut response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return response.json::<Vec<Itinerary>>().await.map_err(|e| {
                ItineraryClientError::Unexpected(format!("invalid response body: {}", e))
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ItineraryClientError::Unauthorized);
        }

        let body = error_body_prefix(&mut response).await;
        Err(ItineraryClientError::Unexpected(format!(
            "status {}: {}",
            status, body
        )))
    }
}

/// Reads at most `MAX_ERROR_BODY_BYTES` of the body; the rest is never pulled.
async fn error_body_prefix(response: &mut reqwest::Response) -> String {
    let mut buf = Vec::new();
    while buf.len() < MAX_ERROR_BODY_BYTES {
        match response.chunk().await {
            Ok(Some(chunk)) => buf.extend_from_slice(&chunk),
            _ => break,
        }
    }
    buf.truncate(MAX_ERROR_BODY_BYTES);
    String::from_utf8_lossy(&buf).into_owned()
}
