// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::fmt::Display;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::services::ServiceError;

/// Body returned for every 500. Details go to the log only.
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Message returned when login fails, whether or not the username exists.
pub const WRONG_CREDENTIALS_MESSAGE: &str = "Username or password are wrong, please try again";

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Log the cause and return the opaque 500.
    pub fn internal(cause: impl Display) -> Self {
        tracing::error!(error = %cause, "Request failed with an internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(_) => Self::bad_request(err.to_string()),
            ServiceError::NotFound(_) => Self::not_found(err.to_string()),
            ServiceError::WrongCredentials => Self::unauthorized(WRONG_CREDENTIALS_MESSAGE),
            ServiceError::UserExists => Self::conflict(err.to_string()),
            ServiceError::MismatchedAuthor | ServiceError::MismatchedId => {
                Self::unauthorized(err.to_string())
            }
            ServiceError::Token(_)
            | ServiceError::Password(_)
            | ServiceError::Storage(_)
            | ServiceError::MalformedSubject(_) => Self::internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}
