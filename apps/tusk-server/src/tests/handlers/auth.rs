//! Signup and login handler tests.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;

use super::super::common::*;
use crate::handlers::auth::{login, signup, LoginRequest, SignupRequest};
use crate::server::AUTH_HEADER;

fn signup_request(username: &str, email: &str) -> SignupRequest {
    SignupRequest {
        username: Some(username.to_string()),
        first_name: Some("Test".to_string()),
        last_name: None,
        email: Some(email.to_string()),
        password: Some(TEST_PASSWORD.to_string()),
        birth_date: None,
    }
}

// ================== signup tests ==================

#[tokio::test]
async fn handler_signup_creates_user() {
    let server = create_test_server().await;

    let (status, Json(envelope)) = signup(
        State(server.clone()),
        Json(signup_request("alice", "alice@example.com")),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(envelope.status, "success");
    assert_eq!(envelope.data.message, "User Registered Successfully!");

    let user = server.store.get_user_by_username("alice").await.unwrap();
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.first_name, "Test");
    assert_eq!(user.last_name, None);
    // Stored as a hash, never the plain password
    assert_ne!(user.password_hash, TEST_PASSWORD);
}

#[tokio::test]
async fn handler_signup_stores_birth_date() {
    let server = create_test_server().await;

    let mut request = signup_request("alice", "alice@example.com");
    request.birth_date = Some("1990 5 21".to_string());
    signup(State(server.clone()), Json(request)).await.unwrap();

    let user = server.store.get_user_by_username("alice").await.unwrap();
    let expected = NaiveDate::from_ymd_opt(1990, 5, 21)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc();
    assert_eq!(user.birth_date, Some(expected));
}

#[tokio::test]
async fn handler_signup_accepts_last_name() {
    let server = create_test_server().await;

    let mut request = signup_request("alice", "alice@example.com");
    request.last_name = Some("Smith".to_string());
    signup(State(server.clone()), Json(request)).await.unwrap();

    let user = server.store.get_user_by_username("alice").await.unwrap();
    assert_eq!(user.last_name.as_deref(), Some("Smith"));
}

#[tokio::test]
async fn handler_signup_rejects_short_username() {
    let server = create_test_server().await;

    let err = signup(State(server), Json(signup_request("abc", "alice@example.com")))
        .await
        .unwrap_err();
    assert_validation(err, "Invalid Username");
}

#[tokio::test]
async fn handler_signup_rejects_missing_fields() {
    let server = create_test_server().await;

    let err = signup(State(server), Json(SignupRequest::default()))
        .await
        .unwrap_err();
    assert_validation(err, "Invalid Username");
}

#[tokio::test]
async fn handler_signup_rejects_numeric_first_name() {
    let server = create_test_server().await;

    let mut request = signup_request("alice", "alice@example.com");
    request.first_name = Some("Al1ce".to_string());
    let err = signup(State(server), Json(request)).await.unwrap_err();
    assert_validation(err, "Invalid First Name");
}

#[tokio::test]
async fn handler_signup_rejects_bad_last_name() {
    let server = create_test_server().await;

    let mut request = signup_request("alice", "alice@example.com");
    request.last_name = Some("Smith-Jones".to_string());
    let err = signup(State(server), Json(request)).await.unwrap_err();
    assert_validation(err, "Invalid Last Name");
}

#[tokio::test]
async fn handler_signup_rejects_bad_email() {
    let server = create_test_server().await;

    let err = signup(State(server), Json(signup_request("alice", "not-an-email")))
        .await
        .unwrap_err();
    assert_validation(err, "Invalid Email");
}

#[tokio::test]
async fn handler_signup_rejects_weak_password() {
    let server = create_test_server().await;

    // No digit or uppercase letter
    let mut request = signup_request("alice", "alice@example.com");
    request.password = Some("password".to_string());
    let err = signup(State(server), Json(request)).await.unwrap_err();
    assert_validation(err, "Invalid Password");
}

#[tokio::test]
async fn handler_signup_rejects_bad_birth_date() {
    let server = create_test_server().await;

    let mut request = signup_request("alice", "alice@example.com");
    request.birth_date = Some("not a date".to_string());
    let err = signup(State(server), Json(request)).await.unwrap_err();
    assert_validation(err, "Invalid Birth Date");
}

#[tokio::test]
async fn handler_signup_rejects_duplicate_username() {
    let server = create_test_server().await;

    signup(
        State(server.clone()),
        Json(signup_request("alice", "alice@example.com")),
    )
    .await
    .unwrap();

    let err = signup(
        State(server),
        Json(signup_request("alice", "other@example.com")),
    )
    .await
    .unwrap_err();
    assert_validation(err, "Username already exists");
}

#[tokio::test]
async fn handler_signup_rejects_duplicate_email() {
    let server = create_test_server().await;

    signup(
        State(server.clone()),
        Json(signup_request("alice", "alice@example.com")),
    )
    .await
    .unwrap();

    let err = signup(
        State(server),
        Json(signup_request("alice2", "alice@example.com")),
    )
    .await
    .unwrap_err();
    assert_validation(err, "Email already exists");
}

// ================== login tests ==================

#[tokio::test]
async fn handler_login_returns_token_and_header() {
    let server = create_test_server().await;
    signup(
        State(server.clone()),
        Json(signup_request("alice", "alice@example.com")),
    )
    .await
    .unwrap();

    let (headers, Json(envelope)) = login(
        State(server.clone()),
        Json(LoginRequest {
            identifier: Some("alice".to_string()),
            password: Some(TEST_PASSWORD.to_string()),
        }),
    )
    .await
    .unwrap();

    assert_eq!(envelope.status, "success");
    assert_eq!(envelope.data.message, "User Login Successfully!");
    assert_eq!(
        headers.get(AUTH_HEADER).unwrap().to_str().unwrap(),
        envelope.data.token
    );

    // The issued token authenticates as the registered user
    let principal = server
        .authenticate(&auth_headers(&envelope.data.token))
        .unwrap();
    assert_eq!(principal.user_id.0.to_string(), envelope.data.user_id);
    assert_eq!(principal.email, "alice@example.com");
}

#[tokio::test]
async fn handler_login_accepts_email_identifier() {
    let server = create_test_server().await;
    signup(
        State(server.clone()),
        Json(signup_request("alice", "alice@example.com")),
    )
    .await
    .unwrap();

    let (_, Json(envelope)) = login(
        State(server),
        Json(LoginRequest {
            identifier: Some("alice@example.com".to_string()),
            password: Some(TEST_PASSWORD.to_string()),
        }),
    )
    .await
    .unwrap();
    assert_eq!(envelope.data.message, "User Login Successfully!");
}

#[tokio::test]
async fn handler_login_rejects_unknown_identifier() {
    let server = create_test_server().await;

    let err = login(
        State(server),
        Json(LoginRequest {
            identifier: Some("nobody".to_string()),
            password: Some(TEST_PASSWORD.to_string()),
        }),
    )
    .await
    .unwrap_err();
    assert_validation(err, "Invalid Email or Username.");
}

#[tokio::test]
async fn handler_login_rejects_wrong_password() {
    let server = create_test_server().await;
    signup(
        State(server.clone()),
        Json(signup_request("alice", "alice@example.com")),
    )
    .await
    .unwrap();

    let err = login(
        State(server),
        Json(LoginRequest {
            identifier: Some("alice".to_string()),
            password: Some("Wrong0therPw".to_string()),
        }),
    )
    .await
    .unwrap_err();
    assert_validation(err, "Invalid Password.");
}

#[tokio::test]
async fn handler_login_rejects_missing_password() {
    let server = create_test_server().await;
    signup(
        State(server.clone()),
        Json(signup_request("alice", "alice@example.com")),
    )
    .await
    .unwrap();

    let err = login(
        State(server),
        Json(LoginRequest {
            identifier: Some("alice".to_string()),
            password: None,
        }),
    )
    .await
    .unwrap_err();
    assert_validation(err, "Invalid Password.");
}
