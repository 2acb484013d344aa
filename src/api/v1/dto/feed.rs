/*
 * Responsibility
 * - /feed 系のリクエスト/レスポンス DTO
 * - ids クエリ ("1,2,3") のパース
 */
use serde::{Deserialize, Serialize};

use crate::services::itinerary::Itinerary;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub ids: Option<String>,
}

impl FeedQuery {
    /// Parse the comma-separated `ids` parameter.
    ///
    /// Blank entries are ignored, duplicates are dropped (first occurrence
    /// wins), anything non-numeric is an error.
    pub fn parse_ids(&self) -> Result<Vec<i64>, &'static str> {
        let Some(raw) = self.ids.as_deref() else {
            return Ok(Vec::new());
        };

        let mut ids = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let id = part.parse::<i64>().map_err(|_| "ids must be comma-separated integers")?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: i64,
    pub title: String,
    pub destination: String,
    pub start_date: Option<chrono::NaiveDate>,
    pub short_description: Option<String>,
    pub detailed_description: Option<String>,
}

impl From<Itinerary> for FeedItem {
    fn from(i: Itinerary) -> Self {
        Self {
            id: i.id,
            title: i.title,
            destination: i.destination,
            start_date: i.start_date,
            short_description: i.short_description,
            detailed_description: i.detailed_description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub items: Vec<FeedItem>,
    pub total_items: usize,
}

impl FeedResponse {
    pub fn new(items: Vec<FeedItem>) -> Self {
        Self {
            total_items: items.len(),
            items,
        }
    }
}
