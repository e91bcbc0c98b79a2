//! Store-specific error types
//!
//! Errors that can occur while talking to the data store (constraint
//! violations, timeouts, driver failures).

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// A user with the same username already exists
    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    /// The store did not answer within the configured timeout (in milliseconds)
    #[error("Store operation timed out after {0} ms")]
    Timeout(u64),

    /// Any other driver or connectivity failure
    #[error("Store failure: {0}")]
    Backend(String),
}

impl StoreError {
    /// Timeout error for a deadline of `timeout`
    pub fn timeout(timeout: Duration) -> Self {
        StoreError::Timeout(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))
    }

    /// Classify a driver error
    ///
    /// The pool acquire deadline is the store timeout, so running out of it is a timeout too.
    pub fn from_sqlx(err: sqlx::Error, timeout: Duration) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => StoreError::timeout(timeout),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_timeout_is_timeout() {
        let err = StoreError::from_sqlx(sqlx::Error::PoolTimedOut, Duration::from_secs(3));
        assert!(matches!(err, StoreError::Timeout(3000)));
        assert_eq!(err.to_string(), "Store operation timed out after 3000 ms");
    }

    #[test]
    fn test_other_driver_errors_are_backend() {
        let err = StoreError::from_sqlx(sqlx::Error::RowNotFound, Duration::from_secs(3));
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
