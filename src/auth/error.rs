// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::INTERNAL_ERROR_MESSAGE;

/// Authentication error type returned by the middleware and extractor.
#[derive(Debug)]
pub enum AuthError {
    /// No (or an empty) authorization header
    MissingAuthHeader,
    /// Authorization header is not `bearer:<token>`
    InvalidAuthHeader,
    /// Token decoded but failed signature or expiry checks
    InvalidToken,
    /// Anything else; details are logged, never returned
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::InvalidToken => "invalid_token",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Missing authentication"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'bearer:<token>')")
            }
            AuthError::InvalidToken => write!(f, "Invalid token"),
            AuthError::InternalError(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = match &self {
            AuthError::InternalError(msg) => {
                tracing::error!(error = %msg, "Authentication failed unexpectedly");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            other => other.to_string(),
        };
        let body = Json(AuthErrorBody {
            error,
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
