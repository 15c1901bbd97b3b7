//! Server unit and integration tests.
//!
//! Tests are organized into modules by feature area:
//! - `common` - Shared test helpers and utilities
//! - `gate` - Token verification and ownership gate tests
//! - `handlers` - HTTP handler integration tests
//! - `router` - Assembled-router tests over the HTTP surface

pub mod common;
