//! Common test helpers and utilities for server tests.
//!
//! This module provides shared test infrastructure including:
//! - Test server creation over in-memory SQLite
//! - Signup and login helpers that mint a usable token
//! - Task creation helpers for authenticated tests

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tusk_store_sqlite::SqliteStore;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::handlers::auth::{self, LoginRequest, SignupRequest};
use crate::handlers::tasks::{self, CreateTaskRequest};
use crate::server::{TuskServer, AUTH_HEADER};

/// Password that satisfies every password rule.
pub const TEST_PASSWORD: &str = "Passw0rd";

/// Secret the test config signs tokens with.
pub const TEST_SECRET: &str = "test-secret";

/// Test helper: Config with a fixed secret and a short token lifetime
pub fn test_config() -> ServerConfig {
    ServerConfig {
        jwt_secret: TEST_SECRET.to_string(),
        token_ttl_secs: 3600,
        base_path: "/api/v1".to_string(),
    }
}

/// Test helper: Create a TuskServer with in-memory SQLite
pub async fn create_test_server() -> TuskServer {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    TuskServer::new(store, test_config())
}

/// Test helper: Build a Prometheus handle without installing a global recorder
pub fn test_metrics_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}

/// Test helper: Headers carrying the given access token
pub fn auth_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(AUTH_HEADER, token.parse().unwrap());
    headers
}

/// Test helper: Sign up a user and log them in, returning (token, user_id)
pub async fn signup_and_login(
    server: &TuskServer,
    username: &str,
    email: &str,
) -> (String, String) {
    let signup = SignupRequest {
        username: Some(username.to_string()),
        first_name: Some("Test".to_string()),
        last_name: None,
        email: Some(email.to_string()),
        password: Some(TEST_PASSWORD.to_string()),
        birth_date: None,
    };
    auth::signup(State(server.clone()), Json(signup))
        .await
        .unwrap();

    let login = LoginRequest {
        identifier: Some(username.to_string()),
        password: Some(TEST_PASSWORD.to_string()),
    };
    let (_, Json(envelope)) = auth::login(State(server.clone()), Json(login)).await.unwrap();
    (envelope.data.token, envelope.data.user_id)
}

/// Test helper: Create an incomplete task through the handler, returning its id
pub async fn create_test_task(server: &TuskServer, token: &str, title: &str) -> String {
    let request = CreateTaskRequest {
        title: Some(title.to_string()),
        details: None,
        time: Some("2024-11-08T00:00:00Z".to_string()),
        status: Some("incomplete".to_string()),
    };
    let (_, Json(envelope)) =
        tasks::create_task(State(server.clone()), auth_headers(token), Json(request))
            .await
            .unwrap();
    envelope.data.task.id
}

/// Test helper: Assert an error is a validation failure with the given message
pub fn assert_validation(err: ApiError, expected: &str) {
    match err {
        ApiError::Validation(message) => assert_eq!(message, expected),
        other => panic!("expected validation error, got {other:?}"),
    }
}
