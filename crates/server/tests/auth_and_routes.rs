mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use chrono::{Duration, Utc};
use common::{harness, SECRET};
use jsonwebtoken::{encode, EncodingKey, Header};
use mentorlink_server::auth::Claims;
use mentorlink_server::router::router;
use mentorlink_server::Error;
use serde_json::{json, Value};
use tower::ServiceExt;

fn signed(sub: &str, exp_offset: Duration, secret: &str) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: sub.to_string(),
        iat: now.timestamp(),
        exp: (now + exp_offset).timestamp(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
}

fn auth_message(err: Error) -> String {
    match err {
        Error::Authentication(message) => message,
        other => panic!("expected authentication error, got {:?}", other),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn issued_credential_resolves_identity() {
    let h = harness().await;
    let token = h.state.auth.issue(&h.alice.id).unwrap();
    let identity = h.state.auth.authenticate(Some(&token)).await.unwrap();
    assert_eq!(identity, h.alice);
}

#[tokio::test]
async fn bad_credentials_are_refused() {
    let h = harness().await;
    let auth = &h.state.auth;

    let err = auth.authenticate(None).await.unwrap_err();
    assert_eq!(auth_message(err), "missing credential");
    let err = auth.authenticate(Some("   ")).await.unwrap_err();
    assert_eq!(auth_message(err), "missing credential");

    let err = auth.authenticate(Some("not-a-token")).await.unwrap_err();
    assert_eq!(auth_message(err), "invalid credential");

    let forged = signed(&h.alice.id, Duration::hours(1), "some-other-secret");
    let err = auth.authenticate(Some(&forged)).await.unwrap_err();
    assert_eq!(auth_message(err), "invalid credential");

    let expired = signed(&h.alice.id, Duration::hours(-1), SECRET);
    let err = auth.authenticate(Some(&expired)).await.unwrap_err();
    assert_eq!(auth_message(err), "credential expired");

    let ghost = auth.issue("nobody").unwrap();
    let err = auth.authenticate(Some(&ghost)).await.unwrap_err();
    assert_eq!(auth_message(err), "unknown identity");
}

#[tokio::test]
async fn protected_routes_require_bearer_token() {
    let h = harness().await;
    let app = router(h.state.clone());

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/notifications").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"]["kind"], "authentication");

    let token = h.state.auth.issue(&h.alice.id).unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/notifications")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["unread"], 0);
    assert_eq!(body["notifications"], json!([]));
}

#[tokio::test]
async fn booking_over_http_maps_errors_to_statuses() {
    let h = harness().await;
    let app = router(h.state.clone());
    let token = h.state.auth.issue(&h.alice.id).unwrap();

    let book = |payload: Value| {
        Request::builder()
            .method(Method::POST)
            .uri("/sessions")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    };
    let payload = json!({
        "mentor_id": h.mentor.id,
        "date": "2026-11-02",
        "time": "10:00",
        "service": { "title": "Resume review", "duration_minutes": 30, "price": 0.0 }
    });

    let response = app.clone().oneshot(book(payload.clone())).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let session = json_body(response).await;
    assert_eq!(session["status"], "pending");

    let response = app.clone().oneshot(book(payload.clone())).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await["error"]["kind"], "conflict");

    let mut bad = payload.clone();
    bad["date"] = json!("tomorrow");
    let response = app.clone().oneshot(book(bad)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let session_id = session["id"].as_str().unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::PATCH)
                .uri(format!("/sessions/{}/status", session_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "status": "confirmed" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn refused_handshake_never_registers_presence() {
    let h = harness().await;
    let app = router(h.state.clone());

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/ws?token=garbage").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Valid credential but not an upgrade request: refused by the upgrade itself.
    let token = h.state.auth.issue(&h.alice.id).unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/ws?token={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.status().is_client_error());

    assert!(h.state.presence.online().is_empty());
}
