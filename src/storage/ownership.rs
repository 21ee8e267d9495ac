// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for mutating operations.
//!
//! Every update or delete of a post or account passes through these checks
//! before the store is touched. Existence is checked before ownership, so a
//! missing resource is always reported as missing.

use std::fmt;

use crate::models::{Post, User};

/// What kind of resource an ownership check was about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    User,
    Post,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::User => "User",
            ResourceKind::Post => "Post",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OwnershipError {
    #[error("{kind} not found")]
    NotFound { kind: ResourceKind },

    #[error("user {caller} does not own {kind} {id}")]
    Denied {
        kind: ResourceKind,
        id: u64,
        caller: u64,
    },
}

/// Trait for resources that have an owner.
pub trait OwnedResource {
    const KIND: ResourceKind;

    fn resource_id(&self) -> u64;

    /// Id of the account allowed to mutate this resource.
    fn owner_id(&self) -> u64;
}

impl OwnedResource for Post {
    const KIND: ResourceKind = ResourceKind::Post;

    fn resource_id(&self) -> u64 {
        self.id
    }

    fn owner_id(&self) -> u64 {
        self.owner_id
    }
}

/// An account is owned by itself.
impl OwnedResource for User {
    const KIND: ResourceKind = ResourceKind::User;

    fn resource_id(&self) -> u64 {
        self.id
    }

    fn owner_id(&self) -> u64 {
        self.id
    }
}

/// Trait for enforcing ownership on storage operations.
pub trait OwnershipEnforcer {
    /// Verify that `caller` owns this resource.
    ///
    /// # Errors
    /// Returns `OwnershipError::Denied` if the caller doesn't own the resource.
    fn verify_ownership(&self, caller: u64) -> Result<(), OwnershipError>;
}

impl<T: OwnedResource> OwnershipEnforcer for T {
    fn verify_ownership(&self, caller: u64) -> Result<(), OwnershipError> {
        if self.owner_id() == caller {
            Ok(())
        } else {
            let kind = T::KIND;
            tracing::warn!(
                kind = %kind,
                id = self.resource_id(),
                owner_id = self.owner_id(),
                caller,
                "Ownership check failed"
            );
            Err(OwnershipError::Denied {
                kind,
                id: self.resource_id(),
                caller,
            })
        }
    }
}

/// Ownership check on the result of a store lookup.
pub trait OwnershipCheck<T> {
    /// Return the resource if it exists and `caller` owns it.
    fn verify_owner(self, caller: u64) -> Result<T, OwnershipError>;
}

impl<T: OwnedResource> OwnershipCheck<T> for Option<T> {
    fn verify_owner(self, caller: u64) -> Result<T, OwnershipError> {
        match self {
            Some(resource) => {
                resource.verify_ownership(caller)?;
                Ok(resource)
            }
            None => Err(OwnershipError::NotFound { kind: T::KIND }),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn post(id: u64, owner_id: u64) -> Post {
        let now = Utc::now();
        Post {
            id,
            title: "title".to_string(),
            body: "body".to_string(),
            owner_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn user(id: u64) -> User {
        let now = Utc::now();
        User {
            id,
            name: "Name".to_string(),
            username: format!("user{id}"),
            password_hash: "hash".to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn owner_passes_post_check() {
        assert!(post(5, 2).verify_ownership(2).is_ok());
    }

    #[test]
    fn non_owner_fails_post_check() {
        assert_eq!(
            post(5, 2).verify_ownership(3),
            Err(OwnershipError::Denied {
                kind: ResourceKind::Post,
                id: 5,
                caller: 3,
            })
        );
    }

    #[test]
    fn account_is_owned_by_itself() {
        assert!(user(7).verify_ownership(7).is_ok());
        assert!(matches!(
            user(7).verify_ownership(8),
            Err(OwnershipError::Denied {
                kind: ResourceKind::User,
                ..
            })
        ));
    }

    #[test]
    fn ownership_check_on_option_some() {
        let checked = Some(post(5, 2)).verify_owner(2).unwrap();
        assert_eq!(checked.id, 5);
    }

    #[test]
    fn missing_resource_reported_before_ownership() {
        let result = None::<Post>.verify_owner(3);
        assert_eq!(
            result,
            Err(OwnershipError::NotFound {
                kind: ResourceKind::Post
            })
        );
    }
}
