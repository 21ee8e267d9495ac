// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Errors returned by the service layer.

use crate::{
    auth::{PasswordError, TokenError},
    storage::{OwnershipError, ResourceKind, StorageError},
};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Request data failed validation.
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// Password did not match the stored hash.
    #[error("wrong credentials")]
    WrongCredentials,

    #[error("A user with the same username already exists")]
    UserExists,

    #[error("Only the author of a post can change it")]
    MismatchedAuthor,

    #[error("Only the account owner can change it")]
    MismatchedId,

    #[error("token error: {0}")]
    Token(#[from] TokenError),

    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Authenticated subject is not a user id.
    #[error("malformed token subject: {0}")]
    MalformedSubject(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<OwnershipError> for ServiceError {
    fn from(err: OwnershipError) -> Self {
        match err {
            OwnershipError::NotFound { kind } => ServiceError::NotFound(kind.as_str()),
            OwnershipError::Denied {
                kind: ResourceKind::Post,
                ..
            } => ServiceError::MismatchedAuthor,
            OwnershipError::Denied {
                kind: ResourceKind::User,
                ..
            } => ServiceError::MismatchedId,
        }
    }
}

/// Storage conflicts on usernames surface as `UserExists`.
pub(crate) fn username_conflict(err: StorageError) -> ServiceError {
    match err {
        StorageError::AlreadyExists(_) => ServiceError::UserExists,
        other => ServiceError::Storage(other),
    }
}
