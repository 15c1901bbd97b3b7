//! Credential primitives: password hashing and signed access tokens.
//!
//! Passwords are hashed with Argon2id and stored in PHC string format, salt
//! included. Access tokens are HS256 JWTs carrying the subject's user id and
//! email, with issued-at and expiry timestamps validated on every decode.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors from password hashing and verification.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(argon2::password_hash::Error),
}

/// Errors from token signing and verification.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token rejected: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

/// Claims carried by an access token.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Claims {
    /// Subject, the holder's user id.
    pub sub: String,
    /// Account email, carried for display and logging.
    pub email: String,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

/// Hash a plaintext password with Argon2id under a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(PasswordError::Hash)?;
    Ok(hash.to_string())
}

/// Check a plaintext password against a stored PHC-format hash.
///
/// A wrong password is `Ok(false)`; `Err` means the stored hash itself could
/// not be used.
pub fn verify_password(plain: &str, phc_hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(phc_hash).map_err(PasswordError::Hash)?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Hash(e)),
    }
}

/// Issue a signed access token for a user, valid for `ttl_secs` from now.
pub fn sign_token(
    user_id: &Uuid,
    email: &str,
    secret: &str,
    ttl_secs: i64,
) -> Result<String, TokenError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        iat: now,
        exp: now + ttl_secs,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Verify a token's signature and expiry and return its claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}
