//! Exercise API handlers
//!
//! Logging exercises against a user and reading back the exercise log.

use crate::api::extract::{NumberInput, Payload};
use crate::dates::{format_canonical, parse_exercise_date, parse_range_bound};
use crate::error::AppError;
use crate::state::AppState;
use crate::store::{Exercise, LogFilter, NewExercise, User};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, info};

/// Add exercise request
#[derive(Debug, Default, Deserialize)]
pub struct AddExerciseRequest {
    /// What was done
    pub description: Option<String>,
    /// Minutes spent
    pub duration: Option<NumberInput>,
    /// Calendar day; today when absent or blank
    pub date: Option<String>,
}

/// Query parameters of the log endpoint
///
/// Kept as raw strings so bad values can be reported per parameter.
#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    /// Inclusive lower bound, `YYYY-MM-DD`
    pub from: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`
    pub to: Option<String>,
    /// Maximum number of entries
    pub limit: Option<String>,
}

/// Exercise as returned after creation, merged with its user
#[derive(Debug, Serialize)]
pub struct ExerciseResponse {
    /// ID of the user
    #[serde(rename = "_id")]
    pub id: String,
    /// Username of the user
    pub username: String,
    /// What was done
    pub description: String,
    /// Minutes spent
    #[serde(serialize_with = "serialize_minutes")]
    pub duration: f64,
    /// Canonical date string
    pub date: String,
}

/// One entry of an exercise log
#[derive(Debug, Serialize)]
pub struct LogEntry {
    /// What was done
    pub description: String,
    /// Minutes spent
    #[serde(serialize_with = "serialize_minutes")]
    pub duration: f64,
    /// Canonical date string
    pub date: String,
}

impl From<Exercise> for LogEntry {
    fn from(exercise: Exercise) -> Self {
        Self {
            description: exercise.description,
            duration: exercise.duration,
            date: format_canonical(exercise.date),
        }
    }
}

/// Exercise log response
#[derive(Debug, Serialize)]
pub struct LogResponse {
    /// Username of the user
    pub username: String,
    /// Number of entries in `log`
    pub count: usize,
    /// ID of the user
    #[serde(rename = "_id")]
    pub id: String,
    /// Matching exercises
    pub log: Vec<LogEntry>,
}

/// Whole minutes go out as integers (`30`, not `30.0`)
fn serialize_minutes<S: Serializer>(minutes: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if minutes.fract() == 0.0 && minutes.abs() <= MAX_EXACT {
        serializer.serialize_i64(*minutes as i64)
    } else {
        serializer.serialize_f64(*minutes)
    }
}

impl AddExerciseRequest {
    /// Validate the body and build the record to store
    fn into_new_exercise(
        self,
        user_id: String,
        today: chrono::NaiveDate,
    ) -> Result<NewExercise, AppError> {
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .ok_or_else(|| AppError::Validation("description is required".to_string()))?;

        let duration = match self.duration.as_ref().map(NumberInput::value) {
            None | Some(Ok(None)) => {
                return Err(AppError::Validation("duration is required".to_string()))
            }
            Some(Ok(Some(minutes))) => minutes,
            Some(Err(raw)) => {
                return Err(AppError::Validation(format!(
                    "duration must be a number, got: {}",
                    raw
                )))
            }
        };
        if !duration.is_finite() || duration < 0.0 {
            return Err(AppError::Validation(format!(
                "duration must be a non-negative number, got: {}",
                duration
            )));
        }

        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => today,
            Some(raw) => parse_exercise_date(raw)
                .ok_or_else(|| AppError::Validation(format!("Invalid date: {}", raw)))?,
        };

        Ok(NewExercise {
            user_id,
            description,
            duration,
            date,
        })
    }
}

impl LogQuery {
    /// Turn the raw parameters into a store filter
    ///
    /// `from` is checked before `to`; the first invalid bound is reported.
    pub fn into_filter(self, user_id: String) -> Result<LogFilter, AppError> {
        let from = parse_bound("from", self.from)?;
        let to = parse_bound("to", self.to)?;
        // Non-numeric or non-positive limits mean "no limit"
        let limit = self
            .limit
            .as_deref()
            .and_then(leading_integer)
            .filter(|n| *n > 0)
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX));

        Ok(LogFilter {
            user_id,
            from,
            to,
            limit,
        })
    }
}

/// Leading integer of `raw`, read like JavaScript's `parseInt`
///
/// `"10abc"` is 10 and `"2.5"` is 2; text without leading digits is `None`.
fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return None;
    }
    // Too many digits for i64 still means "huge"
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn parse_bound(
    param: &'static str,
    raw: Option<String>,
) -> Result<Option<chrono::NaiveDate>, AppError> {
    match raw.filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => match parse_range_bound(&value) {
            Some(date) => {
                debug!(param, %date, "Valid range bound");
                Ok(Some(date))
            }
            None => Err(AppError::InvalidDateParam { param, value }),
        },
    }
}

async fn require_user(state: &AppState, user_id: &str) -> Result<User, AppError> {
    state.store.find_user(user_id).await?.ok_or_else(|| {
        info!(user_id, "User not found");
        AppError::UserNotFound
    })
}

/// POST /api/users/:id/exercises - Log an exercise for a user
///
/// The user is resolved before anything is written, so a 404 leaves no
/// exercise behind.
pub async fn add_exercise(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Payload(request): Payload<AddExerciseRequest>,
) -> Result<Json<ExerciseResponse>, AppError> {
    let new_exercise = request.into_new_exercise(user_id.clone(), state.clock.today())?;
    let user = require_user(&state, &user_id).await?;

    let exercise = state.store.create_exercise(new_exercise).await?;
    info!(
        exercise_id = %exercise.id,
        user_id = %user.id,
        date = %exercise.date,
        "Exercise saved"
    );

    Ok(Json(ExerciseResponse {
        id: user.id,
        username: user.username,
        description: exercise.description,
        duration: exercise.duration,
        date: format_canonical(exercise.date),
    }))
}

/// GET /api/users/:id/logs - Exercise log of a user
pub async fn get_log(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    query: Result<Query<LogQuery>, QueryRejection>,
) -> Result<Json<LogResponse>, AppError> {
    let Query(query) = query?;
    let filter = query.into_filter(user_id)?;
    debug!(?filter, "Log query");

    let exercises = state.store.find_exercises(&filter).await?;
    debug!(count = exercises.len(), "Exercises found");

    let user = require_user(&state, &filter.user_id).await?;

    let log: Vec<LogEntry> = exercises.into_iter().map(LogEntry::from).collect();
    info!(user_id = %user.id, count = log.len(), "Served exercise log");

    Ok(Json(LogResponse {
        username: user.username,
        count: log.len(),
        id: user.id,
        log,
    }))
}
