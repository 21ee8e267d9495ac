// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Services
//!
//! Business rules between the HTTP handlers and the stores:
//!
//! - [`AuthService`]: login and registration
//! - [`UserService`]: account lookup, self-service update and deletion
//! - [`PostService`]: post lookup and author-only mutation
//!
//! Services are synchronous and cheap to construct; handlers build them from
//! [`crate::state::AppState`] per request.

pub mod auth;
pub mod error;
pub mod posts;
pub mod users;

pub use auth::{AuthService, RegisteredUser};
pub use error::{ServiceError, ServiceResult};
pub use posts::{PostService, PostWithAuthor};
pub use users::UserService;

use crate::auth::AuthenticatedUser;

/// Numeric id of the authenticated caller.
pub fn caller_id(user: &AuthenticatedUser) -> ServiceResult<u64> {
    user.user_id()
        .map_err(|_| ServiceError::MalformedSubject(user.subject.clone()))
}

/// Reject a missing or blank required field.
pub(crate) fn require(field: &'static str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        Err(ServiceError::InvalidInput(format!("{field} is required")))
    } else {
        Ok(())
    }
}

/// Optional update field; blank means "leave unchanged".
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::auth::{PasswordCrypto, PasswordError};

    /// Reversible stand-in for Argon2 so service tests stay fast.
    pub struct PlainHasher;

    impl PasswordCrypto for PlainHasher {
        fn hash(&self, password: &str) -> Result<String, PasswordError> {
            Ok(format!("plain:{password}"))
        }

        fn verify(&self, hash: &str, password: &str) -> Result<(), PasswordError> {
            match hash.strip_prefix("plain:") {
                Some(stored) if stored == password => Ok(()),
                Some(_) => Err(PasswordError::Mismatch),
                None => Err(PasswordError::Hash("not a plain hash".to_string())),
            }
        }
    }
}
