//! Strongly-typed identifiers.
//!
//! Keeping user and task ids as distinct types means ownership checks compare
//! canonical values; a raw string never reaches an equality test.

use uuid::Uuid;

/// User identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

/// Task identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(pub Uuid);
