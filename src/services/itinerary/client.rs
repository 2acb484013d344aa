//! Itinerary service client interface.
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::auth::CredentialContext;

/// Itinerary as returned by the itinerary service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub id: i64,
    pub title: String,
    pub destination: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub detailed_description: Option<String>,
}

/// Itinerary client errors.
///
/// Kept separate from `AppError` so callers decide how to surface them.
#[derive(Debug, Clone, Error)]
pub enum ItineraryClientError {
    /// Downstream refused the forwarded credential (401/403).
    #[error("itinerary service refused the credential")]
    Unauthorized,
    #[error("itinerary service network error: {0}")]
    Network(String),
    #[error("itinerary service unexpected response: {0}")]
    Unexpected(String),
}

impl From<reqwest::Error> for ItineraryClientError {
    fn from(err: reqwest::Error) -> Self {
        ItineraryClientError::Network(err.to_string())
    }
}

#[async_trait]
pub trait ItineraryClient: Send + Sync {
    /// Fetch itineraries by id.
    ///
    /// Calls `POST /itinerary/by-ids`. The caller's credential (if any) is
    /// forwarded unchanged; without one the call goes out unauthenticated and
    /// the itinerary service decides whether that is acceptable.
    async fn get_itineraries_by_ids(
        &self,
        credential: &CredentialContext,
        ids: &[i64],
    ) -> Result<Vec<Itinerary>, ItineraryClientError>;
}
