//! Server configuration loaded from environment variables.

use std::env;

use thiserror::Error;

const DEFAULT_TOKEN_TTL_SECS: i64 = 86_400;
const DEFAULT_BASE_PATH: &str = "/api/v1";

/// Runtime configuration for the API server.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Secret for signing and verifying access tokens.
    pub jwt_secret: String,
    /// Access-token lifetime in seconds.
    pub token_ttl_secs: i64,
    /// Path prefix the task/user API is mounted under.
    pub base_path: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

impl ServerConfig {
    /// Load configuration from the environment.
    ///
    /// `TUSK_JWT_SECRET` is required and must be non-empty.
    /// `TUSK_TOKEN_TTL_SECS` defaults to one day and must be positive.
    /// `TUSK_BASE_PATH` defaults to `/api/v1` and must start with `/`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret =
            env::var("TUSK_JWT_SECRET").map_err(|_| ConfigError::MissingEnvVar("TUSK_JWT_SECRET"))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::InvalidValue(
                "TUSK_JWT_SECRET",
                "must not be empty".to_string(),
            ));
        }

        let token_ttl_secs = match env::var("TUSK_TOKEN_TTL_SECS") {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|ttl| *ttl > 0)
                .ok_or(ConfigError::InvalidValue("TUSK_TOKEN_TTL_SECS", raw))?,
            Err(_) => DEFAULT_TOKEN_TTL_SECS,
        };

        let base_path = match env::var("TUSK_BASE_PATH") {
            Ok(raw) => {
                if !raw.starts_with('/') || raw.len() < 2 {
                    return Err(ConfigError::InvalidValue("TUSK_BASE_PATH", raw));
                }
                raw
            }
            Err(_) => DEFAULT_BASE_PATH.to_string(),
        };

        Ok(ServerConfig {
            jwt_secret,
            token_ttl_secs,
            base_path,
        })
    }
}
