//! User entity store.
//!
//! This module defines the `UserStore` trait that abstracts the document
//! database behind the CRUD operations the HTTP layer needs.

mod surreal;

pub use surreal::SurrealUserStore;

use async_trait::async_trait;
use user_api_common::{NewUser, User, UserId, UserPatch};

/// Errors raised by a user store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(String),
}

impl From<surrealdb::Error> for StoreError {
    fn from(e: surrealdb::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Durable CRUD access to user records.
///
/// Each operation touches at most one record, so implementations only need
/// single-record atomicity. Concurrent writes to the same record are
/// last-write-wins.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new record, assigning its id and timestamps.
    async fn create(&self, user: NewUser) -> Result<User>;

    /// All records, oldest first.
    async fn find_all(&self) -> Result<Vec<User>>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>>;

    /// Overwrite the fields present in `patch` and refresh `updatedAt`.
    ///
    /// Returns the record as it is after the update, or `None` if no record
    /// has this id.
    async fn update_by_id(&self, id: &UserId, patch: UserPatch) -> Result<Option<User>>;

    /// Remove a record, returning it as it was before deletion.
    async fn delete_by_id(&self, id: &UserId) -> Result<Option<User>>;
}
