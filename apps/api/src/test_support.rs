//! Shared fixtures for handler tests: an `AppState` over `MemoryStore`, session
//! tokens, and a one-shot request helper against the real router.

use std::sync::Arc;

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

use crate::config::Config;
use crate::llm_client::{CannedGenerator, TextGenerator};
use crate::models::user::User;
use crate::routes::build_router;
use crate::session::{issue_token, Session};
use crate::state::AppState;
use crate::store::memory::MemoryStore;

pub const SECRET: &str = "test-session-secret";

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        s3_bucket: "kalamkunja-test".to_string(),
        s3_endpoint: "http://localhost:9000".to_string(),
        s3_public_url: "http://localhost:9000/kalamkunja-test".to_string(),
        aws_access_key_id: "test".to_string(),
        aws_secret_access_key: "test".to_string(),
        anthropic_api_key: "test".to_string(),
        session_secret: SECRET.to_string(),
        profile_view_retention: 1000,
        port: 0,
        rust_log: "debug".to_string(),
    }
}

fn test_s3() -> aws_sdk_s3::Client {
    let conf = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new("test", "test", None, None, "test"))
        .endpoint_url("http://localhost:9000")
        .build();
    aws_sdk_s3::Client::from_conf(conf)
}

pub fn state_with(store: Arc<MemoryStore>, ai: Arc<dyn TextGenerator>) -> AppState {
    AppState {
        store,
        s3: test_s3(),
        ai,
        config: test_config(),
    }
}

pub fn state(store: Arc<MemoryStore>) -> AppState {
    state_with(store, Arc::new(CannedGenerator::failing(503)))
}

pub fn token_for(user: &User) -> String {
    let session = Session {
        user_id: user.id,
        email: user.email.clone(),
        role: user.role.clone(),
        is_verified: user.is_verified,
    };
    issue_token(&session, SECRET, 3600)
}

/// Sends one request through the full router and returns status + JSON body.
/// Panics if the response body is not JSON.
pub async fn send(
    state: AppState,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header("authorization", format!("Bearer {token}"));
    }
    let req = match body {
        Some(json) => req
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let res = build_router(state).oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!(
            "{status} response is not JSON ({e}): {:?}",
            String::from_utf8_lossy(&bytes)
        )
    });
    (status, json)
}
