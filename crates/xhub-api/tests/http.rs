//! Drives the full router in-process: status codes, auth layers and the
//! delivery agent contract as seen over HTTP.

use std::sync::Arc;

use argon2::Params;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use xhub_api::auth::AppStateInner;
use xhub_api::routes::router;
use xhub_core::{Hub, HubConfig};
use xhub_db::Database;

const ADMIN: &str = "agent-secret";

struct TestApp {
    app: Router,
    hub: Hub,
}

impl TestApp {
    fn new() -> Self {
        let mut config = HubConfig::new(ADMIN);
        config.password_params = Params::new(8, 1, 1, None).unwrap();
        let hub = Hub::new(Arc::new(Database::open_in_memory().unwrap()), config);
        let app = router(Arc::new(AppStateInner { hub: hub.clone() }));
        Self { app, hub }
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        headers: &[(&str, &str)],
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn user(&self, username: &str) -> String {
        let email = format!("{username}@x.com");
        let (status, _) = self
            .call(
                "POST",
                "/auth/request_reg",
                &[],
                Some(json!({"username": username, "password": "password1", "email": email})),
            )
            .await;
        assert_eq!(status, StatusCode::ACCEPTED);

        let code = self.hub.pending_verification(&email).unwrap().unwrap().code;
        let (status, _) = self
            .call(
                "POST",
                "/auth/confirm_reg",
                &[],
                Some(json!({"email": email, "code": code})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .call(
                "POST",
                "/auth/login",
                &[],
                Some(json!({"username": username, "password": "password1"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["auth"], true);
        body["token"].as_str().unwrap().to_string()
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new();
    let (status, body) = app.call("GET", "/", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "XHUB Online");
}

#[tokio::test]
async fn registration_and_mail_queue() {
    let app = TestApp::new();
    let (status, _) = app
        .call(
            "POST",
            "/auth/request_reg",
            &[],
            Some(json!({"username": "alice", "password": "password1", "email": "alice@x.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, body) = app
        .call(
            "POST",
            "/auth/confirm_reg",
            &[],
            Some(json!({"email": "alice@x.com", "code": "000000"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid code");

    let (status, _) = app.call("GET", "/sys/get_mail", &[], None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .call("GET", "/sys/get_mail", &[("x-admin-key", "wrong")], None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, mail) = app
        .call("GET", "/sys/get_mail", &[("x-admin-key", ADMIN)], None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let mail = mail.as_array().unwrap();
    assert_eq!(mail.len(), 1);
    assert_eq!(mail[0]["recipient"], "alice@x.com");
    assert_eq!(mail[0]["status"], "pending");

    // The code travels as a number from older clients
    let code: u32 = mail[0]["body"]
        .as_str()
        .unwrap()
        .trim_start_matches("Code: ")
        .parse()
        .unwrap();
    let (status, _) = app
        .call(
            "POST",
            "/auth/confirm_reg",
            &[],
            Some(json!({"email": "alice@x.com", "code": code})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .call(
            "POST",
            "/sys/confirm_mail",
            &[("x-admin-key", ADMIN)],
            Some(json!({"email": "alice@x.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["acknowledged"], 1);

    let (_, mail) = app
        .call("GET", "/sys/get_mail", &[("x-admin-key", ADMIN)], None)
        .await;
    assert!(mail.as_array().unwrap().is_empty());

    let (status, body) = app
        .call(
            "POST",
            "/sys/confirm_mail",
            &[("x-admin-key", ADMIN)],
            Some(json!({"email": "alice@x.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["acknowledged"], 0);
}

#[tokio::test]
async fn malformed_code_is_invalid_code() {
    let app = TestApp::new();
    app.call(
        "POST",
        "/auth/request_reg",
        &[],
        Some(json!({"username": "alice", "password": "password1", "email": "alice@x.com"})),
    )
    .await;

    let (status, body) = app
        .call(
            "POST",
            "/auth/confirm_reg",
            &[],
            Some(json!({"email": "alice@x.com", "code": "12345"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid code");
}

#[tokio::test]
async fn duplicate_username_is_conflict() {
    let app = TestApp::new();
    app.user("alice").await;

    let (status, body) = app
        .call(
            "POST",
            "/auth/request_reg",
            &[],
            Some(json!({"username": "alice", "password": "password1", "email": "other@x.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username taken");
}

#[tokio::test]
async fn invalid_payloads_are_rejected() {
    let app = TestApp::new();

    let (status, _) = app
        .call(
            "POST",
            "/auth/request_reg",
            &[],
            Some(json!({"username": "alice", "password": "short", "email": "alice@x.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call(
            "POST",
            "/auth/request_reg",
            &[],
            Some(json!({"username": "alice", "password": "password1", "email": "not-an-email"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bad_login_is_unauthorized() {
    let app = TestApp::new();
    app.user("alice").await;

    let (status, _) = app
        .call(
            "POST",
            "/auth/login",
            &[],
            Some(json!({"username": "alice", "password": "password2"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_need_a_session() {
    let app = TestApp::new();

    let (status, _) = app.call("GET", "/messages", &[], None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let forged = bearer("forged");
    let (status, _) = app
        .call("GET", "/friends", &[("authorization", forged.as_str())], None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Another scheme carries no session token
    let (status, body) = app
        .call(
            "GET",
            "/friends",
            &[("authorization", "Basic YWxpY2U6cHc=")],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn friend_flow_over_http() {
    let app = TestApp::new();
    let alice = bearer(&app.user("alice").await);
    let bob = bearer(&app.user("bob").await);

    for _ in 0..2 {
        let (status, _) = app
            .call(
                "POST",
                "/friend_requests",
                &[("authorization", alice.as_str())],
                Some(json!({"to": "bob"})),
            )
            .await;
        assert_eq!(status, StatusCode::ACCEPTED);
    }

    let (_, incoming) = app
        .call("GET", "/friend_requests", &[("authorization", bob.as_str())], None)
        .await;
    let incoming = incoming.as_array().unwrap();
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0]["from_user"], "alice");

    let (status, _) = app
        .call(
            "POST",
            "/friend_requests/respond",
            &[("authorization", bob.as_str())],
            Some(json!({"from": "alice", "decision": "accepted"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, friends) = app
        .call("GET", "/friends", &[("authorization", alice.as_str())], None)
        .await;
    assert_eq!(friends["friends"], json!(["bob"]));

    let (status, _) = app
        .call(
            "POST",
            "/presence/update",
            &[("authorization", bob.as_str())],
            Some(json!({"status": "Away", "game": "Chess"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, presence) = app
        .call("GET", "/presence/list", &[("authorization", alice.as_str())], None)
        .await;
    assert_eq!(presence, json!([{"username": "bob", "status": "Away", "game": "Chess"}]));

    let (status, _) = app
        .call("DELETE", "/friends/alice", &[("authorization", bob.as_str())], None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, friends) = app
        .call("GET", "/friends", &[("authorization", alice.as_str())], None)
        .await;
    assert_eq!(friends["friends"], json!([]));
}

#[tokio::test]
async fn friend_named_like_a_route_can_be_removed() {
    let app = TestApp::new();
    let alice = bearer(&app.user("alice").await);
    let requests = bearer(&app.user("requests").await);

    app.call(
        "POST",
        "/friend_requests",
        &[("authorization", alice.as_str())],
        Some(json!({"to": "requests"})),
    )
    .await;
    let (status, _) = app
        .call(
            "POST",
            "/friend_requests/respond",
            &[("authorization", requests.as_str())],
            Some(json!({"from": "alice", "decision": "accepted"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call("DELETE", "/friends/requests", &[("authorization", alice.as_str())], None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, friends) = app
        .call("GET", "/friends", &[("authorization", alice.as_str())], None)
        .await;
    assert_eq!(friends["friends"], json!([]));
}

#[tokio::test]
async fn self_request_is_bad_request() {
    let app = TestApp::new();
    let alice = bearer(&app.user("alice").await);

    let (status, _) = app
        .call(
            "POST",
            "/friend_requests",
            &[("authorization", alice.as_str())],
            Some(json!({"to": "alice"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn message_cursor_over_http() {
    let app = TestApp::new();
    let alice = bearer(&app.user("alice").await);
    let bob = bearer(&app.user("bob").await);

    for n in 1..=3 {
        let (status, body) = app
            .call(
                "POST",
                "/messages",
                &[("authorization", alice.as_str())],
                Some(json!({"to": "bob", "content": format!("msg {n}")})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], n);
    }

    let (_, polled) = app
        .call("GET", "/messages?after=0", &[("authorization", bob.as_str())], None)
        .await;
    let ids: Vec<i64> = polled
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let (_, polled) = app
        .call("GET", "/messages?after=3", &[("authorization", bob.as_str())], None)
        .await;
    assert!(polled.as_array().unwrap().is_empty());

    let (_, history) = app
        .call("GET", "/messages/alice", &[("authorization", bob.as_str())], None)
        .await;
    assert_eq!(history.as_array().unwrap().len(), 3);
    assert_eq!(history[0]["content"], "msg 1");

    let (status, _) = app
        .call(
            "POST",
            "/messages",
            &[("authorization", alice.as_str())],
            Some(json!({"to": "ghost", "content": "hello?"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
