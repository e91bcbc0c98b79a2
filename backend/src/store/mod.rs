//! Data store module
//!
//! The handlers only see the [`ExerciseStore`] capability; the concrete backend
//! (SQLite or in-memory) is picked at startup from the configured URL.

pub mod error;
pub mod memory;
pub mod models;
pub mod sqlite;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use models::{Exercise, LogFilter, NewExercise, User};
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// URL that selects the in-memory backend
pub const MEMORY_URL: &str = "memory";

/// Create/find/filter/limit operations over users and exercises
#[async_trait]
pub trait ExerciseStore: Send + Sync {
    /// Persist a new user; fails if the username is already taken
    async fn create_user(&self, username: &str) -> Result<User, StoreError>;

    /// All users in insertion order
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    /// Look a user up by ID
    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError>;

    /// Persist a new exercise
    ///
    /// The referenced user is not checked here.
    async fn create_exercise(&self, exercise: NewExercise) -> Result<Exercise, StoreError>;

    /// Exercises matching `filter`, ordered by date then insertion, capped at its limit
    async fn find_exercises(&self, filter: &LogFilter) -> Result<Vec<Exercise>, StoreError>;
}

/// Open the store described by `database_url`
///
/// `memory` selects [`MemoryStore`]; anything else is handed to [`SqliteStore`].
pub async fn connect(
    database_url: &str,
    timeout: Duration,
) -> Result<Arc<dyn ExerciseStore>, StoreError> {
    if database_url == MEMORY_URL {
        tracing::warn!("Using in-memory store; data will not survive a restart");
        return Ok(Arc::new(MemoryStore::new()));
    }
    let store = SqliteStore::new(database_url, timeout).await?;
    Ok(Arc::new(store))
}
