// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account lookup and self-service changes.

use std::sync::Arc;

use super::{error::username_conflict, non_blank, ServiceError, ServiceResult};
use crate::{
    auth::PasswordCrypto,
    models::{UpdateUserRequest, User},
    storage::{OwnershipCheck, UserStore},
};

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordCrypto>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, hasher: Arc<dyn PasswordCrypto>) -> Self {
        Self { users, hasher }
    }

    pub fn get_user(&self, id: u64) -> ServiceResult<User> {
        self.users
            .get_user(id)?
            .ok_or(ServiceError::NotFound("User"))
    }

    pub fn get_user_by_username(&self, username: &str) -> ServiceResult<User> {
        self.users
            .get_user_by_username(username)?
            .ok_or(ServiceError::NotFound("User"))
    }

    pub fn list_users(&self) -> ServiceResult<Vec<User>> {
        Ok(self.users.list_users()?)
    }

    /// Update the caller's own account.
    ///
    /// Blank fields are left unchanged; a new password is re-hashed.
    ///
    /// # Errors
    /// `NotFound` if the account does not exist, `MismatchedId` if it is not
    /// the caller's, `UserExists` if the new username is taken.
    pub fn update_user(
        &self,
        caller: u64,
        id: u64,
        changes: UpdateUserRequest,
    ) -> ServiceResult<User> {
        let mut user = self.users.get_user(id)?.verify_owner(caller)?;

        if let Some(name) = non_blank(changes.name) {
            user.name = name;
        }
        if let Some(username) = non_blank(changes.username) {
            if username != user.username {
                if let Some(holder) = self.users.get_user_by_username(&username)? {
                    if holder.id != user.id {
                        return Err(ServiceError::UserExists);
                    }
                }
                user.username = username;
            }
        }
        if let Some(password) = non_blank(changes.password) {
            user.password_hash = self.hasher.hash(&password)?;
        }

        let updated = self.users.update_user(&user).map_err(username_conflict)?;
        tracing::info!(user_id = id, "User updated");
        Ok(updated)
    }

    /// Soft-delete the caller's own account.
    pub fn delete_user(&self, caller: u64, id: u64) -> ServiceResult<()> {
        self.users.get_user(id)?.verify_owner(caller)?;
        self.users.delete_user(id)?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}
