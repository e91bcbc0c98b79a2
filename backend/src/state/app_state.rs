// Application state
// Shared handles injected into every request handler

use crate::dates::{Clock, SystemClock};
use crate::store::{ExerciseStore, MemoryStore};
use std::sync::Arc;

/// State shared by all handlers
///
/// Cloning is cheap; both fields are reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Users and exercises
    pub store: Arc<dyn ExerciseStore>,
    /// Source of the default exercise date
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create state over `store` using the wall clock
    pub fn new(store: Arc<dyn ExerciseStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// State over an empty in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::FixedClock;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_in_memory_state_starts_empty() {
        let state = AppState::in_memory();
        assert!(state.store.list_users().await.unwrap().is_empty());
    }

    #[test]
    fn test_with_clock_overrides_today() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let state = AppState::in_memory().with_clock(Arc::new(FixedClock(day)));
        assert_eq!(state.clock.today(), day);
    }
}
