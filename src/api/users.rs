// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{MessageResponse, UpdateUserRequest, UserResponse},
    services::caller_id,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses((status = 200, body = [UserResponse]))
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.user_service().list_users()?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get the current authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "Account no longer exists"),
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<UserResponse>, ApiError> {
    let id = caller_id(&user)?;
    Ok(Json(state.user_service().get_user(id)?.into()))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = u64, Path, description = "User id")),
    tag = "Users",
    responses(
        (status = 200, body = UserResponse),
        (status = 404, description = "No such user"),
    )
)]
pub async fn get_user(
    Path(id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(state.user_service().get_user(id)?.into()))
}

#[utoipa::path(
    get,
    path = "/api/users/by-username/{username}",
    params(("username" = String, Path, description = "Login name")),
    tag = "Users",
    responses(
        (status = 200, body = UserResponse),
        (status = 404, description = "No such user"),
    )
)]
pub async fn get_user_by_username(
    Path(username): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(
        state.user_service().get_user_by_username(&username)?.into(),
    ))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = u64, Path, description = "User id; must be the caller")),
    request_body = UpdateUserRequest,
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, body = UserResponse),
        (status = 401, description = "Not the caller's account"),
        (status = 404, description = "No such user"),
        (status = 409, description = "Username already taken"),
    )
)]
pub async fn update_user(
    Path(id): Path<u64>,
    State(state): State<AppState>,
    Auth(user): Auth,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let caller = caller_id(&user)?;
    let updated = state.user_service().update_user(caller, id, request)?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = u64, Path, description = "User id; must be the caller")),
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 401, description = "Not the caller's account"),
        (status = 404, description = "No such user"),
    )
)]
pub async fn delete_user(
    Path(id): Path<u64>,
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<MessageResponse>, ApiError> {
    let caller = caller_id(&user)?;
    state.user_service().delete_user(caller, id)?;
    Ok(Json(MessageResponse::new("User deleted")))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::auth::AuthenticatedUser;

    fn state_with_users() -> AppState {
        let state = AppState::in_memory("api-users-secret").unwrap();
        let auth = state.auth_service();
        auth.register("Alice", "alice", "pw").unwrap();
        auth.register("Bob", "bob", "pw").unwrap();
        state
    }

    fn as_user(id: u64) -> Auth {
        Auth(AuthenticatedUser::new(id.to_string()))
    }

    #[tokio::test]
    async fn me_returns_callers_profile() {
        let state = state_with_users();
        let Json(me) = get_current_user(State(state), as_user(2)).await.unwrap();
        assert_eq!(me.username, "bob");
    }

    #[tokio::test]
    async fn non_numeric_subject_is_internal_error() {
        let state = state_with_users();
        let err = get_current_user(State(state), Auth(AuthenticatedUser::new("bob")))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn update_other_account_is_unauthorized() {
        let state = state_with_users();
        let err = update_user(
            Path(1),
            State(state.clone()),
            as_user(2),
            Json(UpdateUserRequest {
                name: Some("Mallory".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);

        let Json(alice) = get_user(Path(1), State(state)).await.unwrap();
        assert_eq!(alice.name, "Alice");
    }

    #[tokio::test]
    async fn delete_own_account() {
        let state = state_with_users();
        let Json(message) = delete_user(Path(1), State(state.clone()), as_user(1))
            .await
            .unwrap();
        assert_eq!(message, MessageResponse::new("User deleted"));

        let err = get_user_by_username(Path("alice".to_string()), State(state.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let Json(users) = list_users(State(state)).await.unwrap();
        assert_eq!(users.len(), 1);
    }
}
