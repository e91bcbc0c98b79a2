//! User API handlers
//!
//! Create and list users.

use crate::api::extract::Payload;
use crate::error::AppError;
use crate::state::AppState;
use crate::store::User;
use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;
use tracing::info;

/// Create user request
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Desired username; must be unique
    pub username: Option<String>,
}

/// POST /api/users - Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    Payload(request): Payload<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let username = request
        .username
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::Validation("username is required".to_string()))?;

    let user = state.store.create_user(username).await?;
    info!(user_id = %user.id, username = %user.username, "User created");

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users - List all users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = state.store.list_users().await?;
    info!(count = users.len(), "Listed users");
    Ok(Json(users))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    fn request(username: Option<&str>) -> Payload<CreateUserRequest> {
        Payload(CreateUserRequest {
            username: username.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn test_list_users_empty() {
        let state = AppState::in_memory();
        let result = list_users(State(state)).await;
        assert!(result.is_ok());
        assert!(result.unwrap().0.is_empty());
    }

    #[tokio::test]
    async fn test_create_user() {
        let state = AppState::in_memory();
        let result = create_user(State(state.clone()), request(Some("alice"))).await;
        assert!(result.is_ok(), "User creation should succeed");
        let (status, user) = result.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(user.username, "alice");
        assert!(!user.id.is_empty());

        let listed = list_users(State(state)).await.unwrap().0;
        assert_eq!(listed, vec![user.0]);
    }

    #[tokio::test]
    async fn test_create_user_trims_username() {
        let state = AppState::in_memory();
        let (_, user) = create_user(State(state), request(Some("  bob "))).await.unwrap();
        assert_eq!(user.username, "bob");
    }

    #[tokio::test]
    async fn test_create_user_duplicate() {
        let state = AppState::in_memory();
        create_user(State(state.clone()), request(Some("alice")))
            .await
            .unwrap();
        let result = create_user(State(state), request(Some("alice"))).await;
        match result.unwrap_err() {
            AppError::Store(StoreError::DuplicateUsername(name)) => assert_eq!(name, "alice"),
            other => panic!("Expected DuplicateUsername error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_user_missing_or_blank_username() {
        let state = AppState::in_memory();
        for username in [None, Some(""), Some("   ")] {
            let result = create_user(State(state.clone()), request(username)).await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
        assert!(state.store.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_listed_users_only_expose_id_and_username() {
        let state = AppState::in_memory();
        create_user(State(state.clone()), request(Some("carol")))
            .await
            .unwrap();
        let users = list_users(State(state)).await.unwrap().0;
        let json = serde_json::to_value(&users).unwrap();
        let entry = json[0].as_object().unwrap();
        let mut keys: Vec<&str> = entry.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["_id", "username"]);
    }
}
