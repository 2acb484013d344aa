/*
 * Responsibility
 * - GET /feed (認証必須): 呼び出し元の credential をそのまま itinerary service に転送
 * - GET /feed/popular (公開): credential なしで itinerary service を呼ぶ
 * - 要求された順序を保ち、itinerary service が返さなかった id は落とす
 */
use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::{
    api::v1::{
        dto::feed::{FeedItem, FeedQuery, FeedResponse},
        extractors::{AuthCtxExtractor, Credential},
    },
    error::AppError,
    services::auth::CredentialContext,
    state::AppState,
};

pub async fn personalized_feed(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Credential(credential): Credential,
    query: Result<Query<FeedQuery>, QueryRejection>,
) -> Result<Json<FeedResponse>, AppError> {
    let query = feed_query(query)?;
    tracing::info!(uid = %ctx.uid(), "building personalized feed");
    build_feed(&state, &credential, &query).await.map(Json)
}

pub async fn popular_feed(
    State(state): State<AppState>,
    Credential(credential): Credential,
    query: Result<Query<FeedQuery>, QueryRejection>,
) -> Result<Json<FeedResponse>, AppError> {
    let query = feed_query(query)?;
    tracing::info!("building popular feed");
    build_feed(&state, &credential, &query).await.map(Json)
}

/// Query string errors (e.g. `ids` given twice) use the API error shape.
fn feed_query(query: Result<Query<FeedQuery>, QueryRejection>) -> Result<FeedQuery, AppError> {
    match query {
        Ok(Query(query)) => Ok(query),
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "invalid feed query");
            Err(AppError::bad_request(
                "INVALID_IDS",
                "ids must be a single comma-separated list of integers",
            ))
        }
    }
}

async fn build_feed(
    state: &AppState,
    credential: &CredentialContext,
    query: &FeedQuery,
) -> Result<FeedResponse, AppError> {
    let ids = query
        .parse_ids()
        .map_err(|msg| AppError::bad_request("INVALID_IDS", msg))?;

    let itineraries = state
        .itineraries
        .get_itineraries_by_ids(credential, &ids)
        .await?;

    let mut by_id: HashMap<i64, _> = itineraries.into_iter().map(|i| (i.id, i)).collect();

    let mut items = Vec::with_capacity(ids.len());
    for id in &ids {
        match by_id.remove(id) {
            Some(itinerary) => items.push(FeedItem::from(itinerary)),
            None => tracing::warn!(itinerary_id = id, "itinerary not returned by itinerary service"),
        }
    }

    Ok(FeedResponse::new(items))
}
