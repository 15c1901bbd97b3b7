//! Authentication handlers: signup and login.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use tusk_storage::{CreateUserParams, StoreError};

use crate::error::ApiError;
use crate::response::{self, Envelope, MessageData};
use crate::server::{TuskServer, AUTH_HEADER};
use crate::validate;

/// Signup request body. Fields arrive as raw strings so that every rule
/// failure answers with its own message instead of a serializer rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub birth_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    /// Username or email.
    pub identifier: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub message: String,
    pub user_id: String,
    #[serde(rename = "x-auth-token")]
    pub token: String,
}

/// Register a new account.
///
/// All field rules run before any store access; duplicate username/email
/// checks run before the insert, with the unique constraint as the backstop
/// against a concurrent signup.
pub async fn signup(
    State(server): State<TuskServer>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<Envelope<MessageData>>), ApiError> {
    let username = req.username.as_deref().unwrap_or("");
    if !validate::valid_username(username) {
        return Err(ApiError::Validation("Invalid Username".to_string()));
    }

    let first_name = req.first_name.as_deref().unwrap_or("");
    if !validate::valid_name(first_name) {
        return Err(ApiError::Validation("Invalid First Name".to_string()));
    }

    // Last name is optional, but when present it follows the name rule
    if let Some(last_name) = req.last_name.as_deref() {
        if !validate::valid_name(last_name) {
            return Err(ApiError::Validation("Invalid Last Name".to_string()));
        }
    }

    let email = req.email.as_deref().unwrap_or("");
    if !validate::valid_email(email) {
        return Err(ApiError::Validation("Invalid Email".to_string()));
    }

    let password = req.password.as_deref().unwrap_or("");
    if !validate::valid_password(password) {
        return Err(ApiError::Validation("Invalid Password".to_string()));
    }

    let birth_date = match req.birth_date.as_deref() {
        None => None,
        Some(raw) => Some(
            tusk_dates::parse_default(Some(raw))
                .ok_or_else(|| ApiError::Validation("Invalid Birth Date".to_string()))?,
        ),
    };

    match server.store.get_user_by_username(username).await {
        Ok(_) => return Err(ApiError::Validation("Username already exists".to_string())),
        Err(StoreError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }
    match server.store.get_user_by_email(email).await {
        Ok(_) => return Err(ApiError::Validation("Email already exists".to_string())),
        Err(StoreError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }

    let password_hash =
        tusk_auth::hash_password(password).map_err(|e| ApiError::Internal(e.to_string()))?;

    server
        .store
        .create_user(&CreateUserParams {
            username: username.to_string(),
            first_name: first_name.to_string(),
            last_name: req.last_name.clone(),
            email: email.to_string(),
            password_hash,
            birth_date,
        })
        .await
        .map_err(|e| match e {
            StoreError::AlreadyExists => {
                ApiError::Validation("Username or email already exists".to_string())
            }
            other => other.into(),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(response::success_message("User Registered Successfully!")),
    ))
}

/// Log in with a username or email plus password.
///
/// The issued token is returned both in the response body and as an
/// `x-auth-token` response header.
pub async fn login(
    State(server): State<TuskServer>,
    Json(req): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<Envelope<LoginData>>), ApiError> {
    let identifier = req.identifier.as_deref().unwrap_or("");
    let user = match server.store.get_user_by_identifier(identifier).await {
        Ok(user) => user,
        Err(StoreError::NotFound) => {
            return Err(ApiError::Validation("Invalid Email or Username.".to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let password = req.password.as_deref().unwrap_or("");
    let valid = tusk_auth::verify_password(password, &user.password_hash)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !valid {
        return Err(ApiError::Validation("Invalid Password.".to_string()));
    }

    let token = tusk_auth::sign_token(
        &user.id.0,
        &user.email,
        &server.config.jwt_secret,
        server.config.token_ttl_secs,
    )
    .map_err(|e| ApiError::Internal(e.to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTH_HEADER,
        token
            .parse()
            .map_err(|_| ApiError::Internal("token is not a valid header value".to_string()))?,
    );

    Ok((
        headers,
        Json(response::success(LoginData {
            message: "User Login Successfully!".to_string(),
            user_id: user.id.0.to_string(),
            token,
        })),
    ))
}
