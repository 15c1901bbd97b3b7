//! Response envelope shared by every endpoint.
//!
//! Successful requests and client failures wrap their payload as
//! `{"status": "success" | "fail", "data": ...}`; server-side errors carry
//! `{"status": "error", "message": ...}` with no detail beyond the generic
//! message.

use serde::Serialize;

/// Body shape for `success` and `fail` responses.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    pub data: T,
}

/// `data` payload carrying a single client-facing message.
#[derive(Debug, Serialize)]
pub struct MessageData {
    pub message: String,
}

/// Body shape for `error` responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
}

pub fn success<T: Serialize>(data: T) -> Envelope<T> {
    Envelope {
        status: "success",
        data,
    }
}

pub fn success_message(message: impl Into<String>) -> Envelope<MessageData> {
    success(MessageData {
        message: message.into(),
    })
}

pub fn fail_message(message: impl Into<String>) -> Envelope<MessageData> {
    Envelope {
        status: "fail",
        data: MessageData {
            message: message.into(),
        },
    }
}

pub fn error(message: impl Into<String>) -> ErrorBody {
    ErrorBody {
        status: "error",
        message: message.into(),
    }
}
