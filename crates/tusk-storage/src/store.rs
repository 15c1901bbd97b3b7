//! The Store trait that backends implement.

use crate::types::*;
use crate::StoreError;

/// The storage trait `tusk-server` depends on.
///
/// Task methods act on bare task ids and do **not** filter by owner; the
/// caller fetches the record and checks ownership before mutating. The two
/// exceptions are `list_tasks` and `delete_tasks_for_user`, which are scoped
/// to one owner by construction.
#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    // ───────────────────────────────────── Users ──────────────────────────────────────────

    /// Create a new user (returns generated ID).
    async fn create_user(&self, params: &CreateUserParams) -> Result<UserId, StoreError>;

    /// Get user by exact username.
    async fn get_user_by_username(&self, username: &str) -> Result<User, StoreError>;

    /// Get user by email.
    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError>;

    /// Get user by username or email (the login lookup).
    async fn get_user_by_identifier(&self, identifier: &str) -> Result<User, StoreError>;

    /// Get user by ID.
    async fn get_user_by_id(&self, user_id: &UserId) -> Result<User, StoreError>;

    // ───────────────────────────────────── Tasks ──────────────────────────────────────────

    /// Create a task and return the stored record.
    async fn create_task(&self, params: &CreateTaskParams) -> Result<Task, StoreError>;

    /// Get task by ID.
    async fn get_task(&self, task_id: &TaskId) -> Result<Task, StoreError>;

    /// List one owner's tasks, oldest first, optionally filtered by status.
    async fn list_tasks(&self, query: &TaskListQuery) -> Result<Vec<Task>, StoreError>;

    /// Apply a partial update and return the stored record. `None` patch
    /// fields keep their current value. Writes are last-write-wins; there is
    /// no version check against concurrent updates.
    async fn update_task(&self, task_id: &TaskId, patch: &TaskPatch) -> Result<Task, StoreError>;

    /// Delete one task.
    async fn delete_task(&self, task_id: &TaskId) -> Result<(), StoreError>;

    /// Delete every task owned by a user; returns how many were removed.
    async fn delete_tasks_for_user(&self, user_id: &UserId) -> Result<u64, StoreError>;
}
