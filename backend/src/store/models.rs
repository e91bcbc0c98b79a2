//! Store records
//!
//! Defines the user and exercise records persisted by every store backend.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct User {
    /// Unique identifier, generated on creation
    #[serde(rename = "_id")]
    pub id: String,
    /// Unique username
    pub username: String,
}

/// A single logged exercise
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Exercise {
    /// Unique identifier, generated on creation
    pub id: String,
    /// ID of the user this exercise was logged against
    pub user_id: String,
    /// What was done
    pub description: String,
    /// Duration in minutes
    pub duration: f64,
    /// Calendar day the exercise happened on
    pub date: NaiveDate,
}

/// Exercise fields supplied by a caller; the store assigns the ID
#[derive(Debug, Clone)]
pub struct NewExercise {
    /// ID of the user the exercise belongs to
    pub user_id: String,
    /// What was done
    pub description: String,
    /// Duration in minutes
    pub duration: f64,
    /// Calendar day, already defaulted by the caller
    pub date: NaiveDate,
}

impl NewExercise {
    /// Turn the request into a stored record with a fresh ID
    pub fn into_exercise(self) -> Exercise {
        Exercise {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: self.user_id,
            description: self.description,
            duration: self.duration,
            date: self.date,
        }
    }
}

/// Filter for an exercise log query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogFilter {
    /// Only exercises logged against this user
    pub user_id: String,
    /// Inclusive lower bound
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound
    pub to: Option<NaiveDate>,
    /// Maximum number of entries; `None` means unlimited
    pub limit: Option<u32>,
}

impl LogFilter {
    /// Filter matching every exercise of a user
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    /// Whether an exercise passes the user and date-range constraints
    ///
    /// The limit is not considered here; it applies to the ordered result.
    pub fn matches(&self, exercise: &Exercise) -> bool {
        exercise.user_id == self.user_id
            && self.from.map_or(true, |from| exercise.date >= from)
            && self.to.map_or(true, |to| exercise.date <= to)
    }
}
