//! Credential forwarding tests (router → itinerary service).
//!
//! The itinerary service is a wiremock server; assertions look at the
//! `Authorization` header it actually received.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use recommendation_gateway::{app::app_router, config::CredentialHeaders};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{StubIdentityProvider, body_json, get, http_itinerary_client, send, state_with};

fn provider() -> Arc<StubIdentityProvider> {
    Arc::new(StubIdentityProvider::new(&[
        ("token-a", "alice"),
        ("token-b", "bob"),
    ]))
}

fn itinerary(id: i64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "destination": "Konstanz",
        "startDate": "2025-06-01",
        "shortDescription": "short",
        "detailedDescription": "long"
    })
}

async fn router_for(server: &MockServer, identity: Arc<StubIdentityProvider>) -> axum::Router {
    let state = state_with(
        identity,
        http_itinerary_client(&server.uri()),
        CredentialHeaders::default(),
    );
    app_router(state)
}

#[tokio::test]
async fn personalized_feed_forwards_caller_token_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/itinerary/by-ids"))
        .and(header("authorization", "Bearer token-a"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([itinerary(2, "two"), itinerary(1, "one")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let router = router_for(&server, provider()).await;
    let res = send(router, get("/api/v1/feed?ids=1,2,3", Some("Bearer token-a"))).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;

    // requested order kept, id 3 (not returned downstream) dropped
    assert_eq!(body["totalItems"], 2);
    assert_eq!(body["items"][0]["id"], 1);
    assert_eq!(body["items"][1]["id"], 2);
    assert_eq!(body["items"][0]["startDate"], "2025-06-01");
}

#[tokio::test]
async fn personalized_feed_without_token_never_reaches_downstream() {
    let server = MockServer::start().await;

    let router = router_for(&server, provider()).await;
    let res = send(router, get("/api/v1/feed?ids=1", None)).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn popular_feed_sends_no_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/itinerary/by-ids"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([itinerary(5, "five")])))
        .mount(&server)
        .await;

    let router = router_for(&server, provider()).await;
    let res = send(router, get("/api/v1/feed/popular?ids=5", None)).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["totalItems"], 1);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(!received[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn popular_feed_does_not_forward_unverified_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let identity = provider();
    let router = router_for(&server, identity.clone()).await;
    let res = send(router, get("/api/v1/feed/popular?ids=5", Some("Bearer token-a"))).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(identity.calls(), 0);

    let received = server.received_requests().await.unwrap();
    assert!(!received[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn concurrent_requests_forward_their_own_tokens() {
    let server = MockServer::start().await;
    for (token, title) in [("Bearer token-a", "for-alice"), ("Bearer token-b", "for-bob")] {
        Mock::given(method("POST"))
            .and(path("/itinerary/by-ids"))
            .and(header("authorization", token))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([itinerary(1, title)]))
                    .set_delay(Duration::from_millis(50)),
            )
            .mount(&server)
            .await;
    }

    // provider delay interleaves the two requests inside the middleware as well
    let identity = Arc::new(
        StubIdentityProvider::new(&[("token-a", "alice"), ("token-b", "bob")])
            .with_delay(Duration::from_millis(20)),
    );
    let router = router_for(&server, identity).await;

    let mut handles = Vec::new();
    for i in 0..10 {
        let (token, expected) = if i % 2 == 0 {
            ("Bearer token-a", "for-alice")
        } else {
            ("Bearer token-b", "for-bob")
        };
        let router = router.clone();
        handles.push(tokio::spawn(async move {
            let res = send(router, get("/api/v1/feed?ids=1", Some(token))).await;
            assert_eq!(res.status(), StatusCode::OK);
            let body = body_json(res).await;
            (body["items"][0]["title"].as_str().unwrap().to_string(), expected)
        }));
    }

    for handle in handles {
        let (title, expected) = handle.await.unwrap();
        assert_eq!(title, expected);
    }

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 10);
    let with_a = received
        .iter()
        .filter(|r| r.headers.get("authorization").unwrap() == "Bearer token-a")
        .count();
    assert_eq!(with_a, 5);
}

#[tokio::test]
async fn downstream_failure_is_502() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("stack trace here"))
        .mount(&server)
        .await;

    let router = router_for(&server, provider()).await;
    let res = send(router, get("/api/v1/feed?ids=1", Some("Bearer token-a"))).await;

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(res).await;
    assert_eq!(body["error"]["message"], "upstream service error");
}

#[tokio::test]
async fn invalid_ids_is_400() {
    let server = MockServer::start().await;

    let router = router_for(&server, provider()).await;
    let res = send(router, get("/api/v1/feed?ids=1,x", Some("Bearer token-a"))).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["error"]["code"], "INVALID_IDS");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn repeated_ids_parameter_is_400_with_api_error_shape() {
    let server = MockServer::start().await;

    for (uri, auth) in [
        ("/api/v1/feed?ids=1&ids=2", Some("Bearer token-a")),
        ("/api/v1/feed/popular?ids=1&ids=2", None),
    ] {
        let router = router_for(&server, provider()).await;
        let res = send(router, get(uri, auth)).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["error"]["code"], "INVALID_IDS");
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn no_ids_means_empty_feed_without_downstream_call() {
    let server = MockServer::start().await;

    let router = router_for(&server, provider()).await;
    let res = send(router, get("/api/v1/feed", Some("Bearer token-b"))).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        body_json(res).await,
        json!({ "items": [], "totalItems": 0 })
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}
