//! Shared helpers for router-level tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use recommendation_gateway::{
    config::CredentialHeaders,
    services::{
        auth::{CredentialContext, IdentityError, IdentityProvider, VerifiedIdentity},
        itinerary::{HttpItineraryClient, Itinerary, ItineraryClient, ItineraryClientError},
    },
    state::AppState,
};
use tower::ServiceExt;
use url::Url;

/// Token that makes the stub provider behave as if it were unreachable.
pub const UNREACHABLE_TOKEN: &str = "provider-down";

/// In-memory identity provider: token → uid.
pub struct StubIdentityProvider {
    accepted: HashMap<String, String>,
    delay: Duration,
    calls: AtomicUsize,
}

impl StubIdentityProvider {
    pub fn new(tokens: &[(&str, &str)]) -> Self {
        Self {
            accepted: tokens
                .iter()
                .map(|(t, uid)| (t.to_string(), uid.to_string()))
                .collect(),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if token == UNREACHABLE_TOKEN {
            return Err(IdentityError::Unavailable("connection refused".into()));
        }

        let uid = self
            .accepted
            .get(token)
            .ok_or_else(|| IdentityError::Rejected("unknown token".into()))?;

        Ok(VerifiedIdentity {
            uid: uid.clone(),
            email: Some(format!("{uid}@example.com")),
            name: Some(uid.to_uppercase()),
            email_verified: true,
            claims: serde_json::json!({ "sub": uid }),
        })
    }
}

/// Itinerary client that must not be called.
pub struct UnusedItineraryClient;

#[async_trait]
impl ItineraryClient for UnusedItineraryClient {
    async fn get_itineraries_by_ids(
        &self,
        _credential: &CredentialContext,
        _ids: &[i64],
    ) -> Result<Vec<Itinerary>, ItineraryClientError> {
        panic!("itinerary client should not be called in this test");
    }
}

pub fn state_with(
    identity: Arc<dyn IdentityProvider>,
    itineraries: Arc<dyn ItineraryClient>,
    headers: CredentialHeaders,
) -> AppState {
    AppState::new(identity, itineraries, headers)
}

pub fn stub_state(identity: Arc<StubIdentityProvider>) -> AppState {
    state_with(
        identity,
        Arc::new(UnusedItineraryClient),
        CredentialHeaders::default(),
    )
}

pub fn http_itinerary_client(base: &str) -> Arc<HttpItineraryClient> {
    let url = Url::parse(base).unwrap();
    Arc::new(HttpItineraryClient::new(&url, Duration::from_secs(5)).unwrap())
}

pub fn get(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn send(router: Router, req: Request<Body>) -> Response<Body> {
    router.oneshot(req).await.unwrap()
}

pub async fn body_bytes(res: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(res: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(res).await).unwrap()
}
