// Copyright 2025 Arpy AI Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

// Integration tests for the HTTP API, run against the real router with
// an in-memory store and the LLM relay in demo mode.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use arpy_server::api::AppState;
use arpy_server::auth::{
    Authenticator, BearerTokenAuth, NoAuth, RateLimitConfig, RateLimiter, TokenIssuer,
};
use arpy_server::build_router;
use arpy_server::llm::LlmManager;
use arpy_storage::MemStorage;

const TEST_SECRET: &str = "test-secret";

fn test_state(auth_enabled: bool) -> AppState {
    AppState {
        storage: Arc::new(MemStorage::new()),
        llm: Arc::new(LlmManager::disabled()),
        token_issuer: Arc::new(TokenIssuer::new(TEST_SECRET)),
        auth_enabled,
    }
}

fn permissive_limiter() -> Arc<RateLimiter> {
    Arc::new(RateLimiter::new(RateLimitConfig {
        max_requests: 10_000,
        window: Duration::from_secs(60),
        enabled: true,
        max_clients: 1_000,
    }))
}

/// Router with no bearer gating, matching the default deployment.
fn open_router() -> Router {
    build_router(test_state(false), Arc::new(NoAuth), permissive_limiter(), true)
}

fn gated_router() -> Router {
    let authenticator: Arc<dyn Authenticator> =
        Arc::new(BearerTokenAuth::new(TEST_SECRET.to_string()));
    build_router(test_state(true), authenticator, permissive_limiter(), true)
}

async fn send_json(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn send_chat(router: &Router, session_id: &str, message: &str) -> Value {
    let (status, body) = send_json(
        router,
        "POST",
        "/api/chat",
        Some(json!({"message": message, "sessionId": session_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn test_health_reports_demo_mode() {
    let router = open_router();
    let (status, body) = send_json(&router, "GET", "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "online");
    assert_eq!(body["features"]["ai"], false);
    assert_eq!(body["features"]["voice"], true);
    assert_eq!(body["features"]["auth"], false);
}

#[tokio::test]
async fn test_chat_round_trip() {
    let router = open_router();

    let body = send_chat(&router, "session-1", "hello").await;
    assert_eq!(body["message"]["role"], "assistant");
    assert_eq!(body["conversation"].as_array().unwrap().len(), 2);
    // Demo mode greets and mentions it needs a key.
    assert!(body["message"]["content"]
        .as_str()
        .unwrap()
        .contains("demo mode"));

    let (status, body) = send_json(&router, "GET", "/api/conversation/session-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][0]["content"], "hello");

    let (status, body) = send_json(&router, "DELETE", "/api/conversation/session-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, body) = send_json(&router, "GET", "/api/conversation/session-1", None).await;
    assert!(body["messages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_history_accumulates() {
    let router = open_router();
    send_chat(&router, "session-1", "first").await;
    let body = send_chat(&router, "session-1", "second").await;
    assert_eq!(body["conversation"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_chat_rejects_blank_message() {
    let router = open_router();
    let (status, body) = send_json(
        &router,
        "POST",
        "/api/chat",
        Some(json!({"message": "  ", "sessionId": "s"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unknown_conversation_is_empty_not_404() {
    let router = open_router();
    let (status, body) = send_json(&router, "GET", "/api/conversation/never-seen", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["messages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_feedback_flow_and_analytics() {
    let router = open_router();

    let chat = send_chat(&router, "session-1", "hello").await;
    let message_id = chat["message"]["id"].as_str().unwrap().to_string();

    let (status, body) = send_json(
        &router,
        "POST",
        "/api/feedback",
        Some(json!({
            "messageId": message_id,
            "sessionId": "session-1",
            "rating": 5,
            "helpful": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["feedback"]["rating"], 5);
    // The store stamps submission time on the way in.
    assert!(body["feedback"]["timestamp"].is_i64());

    let (status, body) = send_json(&router, "GET", "/api/analytics/feedback", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalFeedbacks"], 1);
    assert_eq!(body["averageRating"], 5.0);
    assert_eq!(body["helpfulCount"], 1);
    assert_eq!(body["ratingDistribution"]["5"], 1);
}

#[tokio::test]
async fn test_feedback_unknown_message_is_404() {
    let router = open_router();
    send_chat(&router, "session-1", "hello").await;

    let (status, _) = send_json(
        &router,
        "POST",
        "/api/feedback",
        Some(json!({
            "messageId": "00000000-0000-4000-8000-000000000000",
            "sessionId": "session-1",
            "rating": 3
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_feedback_rating_out_of_range_is_400() {
    let router = open_router();
    let (status, _) = send_json(
        &router,
        "POST",
        "/api/feedback",
        Some(json!({
            "messageId": "00000000-0000-4000-8000-000000000000",
            "sessionId": "session-1",
            "rating": 9
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_conversation_listing() {
    let router = open_router();
    send_chat(&router, "session-a", "first conversation").await;
    // Keep updated_at strictly ordered between the two sessions.
    tokio::time::sleep(Duration::from_millis(5)).await;
    send_chat(&router, "session-b", "second conversation").await;

    let (status, body) = send_json(&router, "GET", "/api/conversations", None).await;
    assert_eq!(status, StatusCode::OK);

    let summaries = body.as_array().unwrap();
    assert_eq!(summaries.len(), 2);
    for summary in summaries {
        assert_eq!(summary["title"], "Untitled Chat");
        assert_eq!(summary["messageCount"], 2);
        assert!(summary["sessionId"].is_string());
        assert!(summary["lastMessage"].is_string());
    }
    // Most recently updated first.
    assert_eq!(summaries[0]["sessionId"], "session-b");
}

#[tokio::test]
async fn test_generate_title_without_provider_is_503() {
    let router = open_router();
    send_chat(&router, "session-1", "hello").await;

    let (status, _) = send_json(
        &router,
        "POST",
        "/api/conversation/session-1/generate-title",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_generate_title_unknown_session_is_404() {
    let router = open_router();
    let (status, _) = send_json(
        &router,
        "POST",
        "/api/conversation/never-seen/generate-title",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_export_transcript() {
    let router = open_router();

    let (status, _) = send_json(
        &router,
        "GET",
        "/api/conversation/never-seen/export",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send_chat(&router, "session-1", "hello transcript").await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/conversation/session-1/export")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/plain"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let transcript = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(transcript.contains("You: hello transcript"));
    assert!(transcript.contains("Arpy AI:"));
}

#[tokio::test]
async fn test_signup_and_login_flow() {
    let router = open_router();

    let (status, body) = send_json(
        &router,
        "POST",
        "/api/auth/signup",
        Some(json!({"username": "ada", "password": "secret123", "email": "ada@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["username"], "ada");
    assert!(body["user"].get("passwordHash").is_none());

    // Duplicate username
    let (status, body) = send_json(
        &router,
        "POST",
        "/api/auth/signup",
        Some(json!({"username": "ada", "password": "other-pass"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username already exists");

    // Correct password
    let (status, body) = send_json(
        &router,
        "POST",
        "/api/auth/login",
        Some(json!({"username": "ada", "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());

    // Wrong password and unknown user answer identically
    let (status, body) = send_json(
        &router,
        "POST",
        "/api/auth/login",
        Some(json!({"username": "ada", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, body) = send_json(
        &router,
        "POST",
        "/api/auth/login",
        Some(json!({"username": "nobody", "password": "whatever"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_signup_validation() {
    let router = open_router();

    let (status, _) = send_json(
        &router,
        "POST",
        "/api/auth/signup",
        Some(json!({"username": "ab", "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &router,
        "POST",
        "/api/auth/signup",
        Some(json!({"username": "ada", "password": "tiny"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bearer_gating_when_enabled() {
    let router = gated_router();

    // Signup stays public and yields a usable token.
    let (status, body) = send_json(
        &router,
        "POST",
        "/api/auth/signup",
        Some(json!({"username": "ada", "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    // Without a token the API refuses.
    let (status, _) = send_json(&router, "GET", "/api/conversations", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // With the issued token it answers.
    let request = Request::builder()
        .method("GET")
        .uri("/api/conversations")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Health stays public.
    let (status, _) = send_json(&router, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_auth_endpoints_are_rate_limited() {
    let limiter = Arc::new(RateLimiter::new(RateLimitConfig {
        max_requests: 2,
        window: Duration::from_secs(60),
        enabled: true,
        max_clients: 100,
    }));
    let router = build_router(test_state(false), Arc::new(NoAuth), limiter, true);

    let attempt = json!({"username": "ada", "password": "wrong"});
    for _ in 0..2 {
        let (status, _) =
            send_json(&router, "POST", "/api/auth/login", Some(attempt.clone())).await;
        assert_ne!(status, StatusCode::TOO_MANY_REQUESTS);
    }

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(attempt.to_string()))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().get("Retry-After").is_some());

    // The chat API is not behind the limiter.
    let (status, _) = send_json(
        &router,
        "POST",
        "/api/chat",
        Some(json!({"message": "hi", "sessionId": "s"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
