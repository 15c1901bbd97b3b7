//! Shared server state and the credential/ownership gate.

use std::sync::Arc;

use axum::http::HeaderMap;
use tusk_storage::{Store, UserId};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::error::ApiError;

/// Header carrying the access token.
pub const AUTH_HEADER: &str = "x-auth-token";

/// Shared state behind every handler: the injected store plus configuration.
#[derive(Clone)]
pub struct TuskServer {
    pub store: Arc<dyn Store>,
    pub config: ServerConfig,
}

/// The authenticated caller, for the lifetime of one request.
#[derive(Clone, Debug)]
pub struct Principal {
    pub user_id: UserId,
    pub email: String,
}

impl TuskServer {
    pub fn new(store: Arc<dyn Store>, config: ServerConfig) -> Self {
        Self { store, config }
    }

    /// Authenticate a request from its headers.
    ///
    /// Verifies the `x-auth-token` value and canonicalizes the token subject
    /// into a typed [`UserId`]. An absent header is `MissingCredential`; a
    /// token that fails verification, or whose subject is not a well-formed
    /// id, is `InvalidCredential`. No store access happens here.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, ApiError> {
        let token = extract_token(headers)?;
        let claims = tusk_auth::verify_token(token, &self.config.jwt_secret)
            .map_err(|_| ApiError::InvalidCredential)?;
        let user_id = Uuid::try_parse(&claims.sub)
            .map(UserId)
            .map_err(|_| ApiError::InvalidCredential)?;
        Ok(Principal {
            user_id,
            email: claims.email,
        })
    }
}

/// Pull the raw token out of the request headers.
pub fn extract_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(AUTH_HEADER)
        .ok_or(ApiError::MissingCredential)?
        .to_str()
        .map_err(|_| ApiError::InvalidCredential)
}

/// Check that the authenticated caller owns the resource.
///
/// Both sides are compared in canonical typed form; a mismatch is
/// `Forbidden`. Callers resolve the resource first, so a missing record
/// surfaces as `NotFound` before ownership is ever examined.
pub fn authorize(principal: &Principal, owner: &UserId) -> Result<(), ApiError> {
    if principal.user_id == *owner {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}
