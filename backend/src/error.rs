//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use crate::store::StoreError;
use axum::{
    extract::rejection::{FormRejection, JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// Each variant maps onto one HTTP status via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed request field
    #[error("{0}")]
    Validation(String),

    /// A `from`/`to` log parameter is not a `YYYY-MM-DD` date
    #[error("Invalid \"{param}\" date: {value}")]
    InvalidDateParam {
        /// Name of the query parameter
        param: &'static str,
        /// Raw value the client sent
        value: String,
    },

    /// Referenced user does not exist
    #[error("User not found")]
    UserNotFound,

    /// Error raised by the data store
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    /// HTTP status this error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidDateParam { .. } => StatusCode::BAD_REQUEST,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::Store(StoreError::DuplicateUsername(_)) => StatusCode::BAD_REQUEST,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Validation("bad".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::UserNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::from(StoreError::DuplicateUsername("alice".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(StoreError::Timeout(10_000)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(StoreError::Backend("disk I/O error".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_date_message_names_parameter() {
        let err = AppError::InvalidDateParam {
            param: "from",
            value: "notadate".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid \"from\" date: notadate");
    }

    #[test]
    fn test_query_rejection_is_validation_error() {
        #[derive(Debug, serde::Deserialize)]
        struct Params {
            #[allow(dead_code)]
            limit: Option<String>,
        }

        let uri: axum::http::Uri = "/logs?limit=1&limit=2".parse().unwrap();
        let rejection = axum::extract::Query::<Params>::try_from_uri(&uri).unwrap_err();
        let err = AppError::from(rejection);
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_message_is_fixed() {
        assert_eq!(AppError::UserNotFound.to_string(), "User not found");
    }
}
