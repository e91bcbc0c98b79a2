//! In-memory store
//!
//! Keeps users and exercises in vectors behind a lock. Same semantics as the
//! SQLite backend, minus durability.

use super::{Exercise, ExerciseStore, LogFilter, NewExercise, StoreError, User};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    exercises: Vec<Exercise>,
}

/// Store backed by process memory
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExerciseStore for MemoryStore {
    async fn create_user(&self, username: &str) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == username) {
            return Err(StoreError::DuplicateUsername(username.to_string()));
        }
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_exercise(&self, exercise: NewExercise) -> Result<Exercise, StoreError> {
        let exercise = exercise.into_exercise();
        self.tables.write().await.exercises.push(exercise.clone());
        Ok(exercise)
    }

    async fn find_exercises(&self, filter: &LogFilter) -> Result<Vec<Exercise>, StoreError> {
        let tables = self.tables.read().await;
        let mut found: Vec<Exercise> = tables
            .exercises
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        // Stable sort keeps insertion order among same-day entries
        found.sort_by_key(|e| e.date);
        if let Some(limit) = filter.limit {
            found.truncate(limit as usize);
        }
        Ok(found)
    }
}
