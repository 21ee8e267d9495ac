// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login and registration endpoints.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::{ApiError, WRONG_CREDENTIALS_MESSAGE},
    models::{LoginRequest, RegisterRequest, RegisterResponse, TokenResponse},
    services::ServiceError,
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Credentials accepted", body = TokenResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Unknown username or wrong password"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state
        .auth_service()
        .login(&request.username, &request.password)
        .map_err(|e| match e {
            // Do not reveal whether the username exists.
            ServiceError::NotFound(_) => ApiError::unauthorized(WRONG_CREDENTIALS_MESSAGE),
            other => other.into(),
        })?;
    Ok(Json(TokenResponse { token }))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Missing field"),
        (status = 409, description = "Username already taken"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let registered =
        state
            .auth_service()
            .register(&request.name, &request.username, &request.password)?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            token: registered.token,
            user: registered.user.into(),
        }),
    ))
}
