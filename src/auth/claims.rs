// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authenticated caller representation.

use std::num::ParseIntError;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The caller of a request, as established by the auth middleware.
///
/// Inserted into the request extensions once the bearer token has been
/// validated and read back by the [`super::Auth`] extractor. It only lives
/// for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Token subject: the caller's user id in decimal form.
    pub subject: String,
}

impl AuthenticatedUser {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    /// Numeric user id of the caller.
    ///
    /// # Errors
    /// Fails if the subject is not a decimal id, which only happens for
    /// tokens this service did not issue.
    pub fn user_id(&self) -> Result<u64, ParseIntError> {
        self.subject.parse()
    }
}
