// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login and registration.

use std::sync::Arc;

use super::{error::username_conflict, require, ServiceError, ServiceResult};
use crate::{
    auth::{PasswordCrypto, PasswordError, TokenHelper},
    models::{NewUser, User},
    storage::UserStore,
};

/// Outcome of a successful registration.
#[derive(Debug, Clone)]
pub struct RegisteredUser {
    pub token: String,
    pub user: User,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordCrypto>,
    tokens: TokenHelper,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordCrypto>,
        tokens: TokenHelper,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    /// `NotFound` for an unknown username, `WrongCredentials` when the
    /// password does not match. Both are reported identically over HTTP.
    pub fn login(&self, username: &str, password: &str) -> ServiceResult<String> {
        require("username", username)?;
        require("password", password)?;

        let Some(user) = self.users.get_user_by_username(username)? else {
            // Spend one key derivation so unknown usernames answer as slowly
            // as wrong passwords.
            let _ = self.hasher.hash(password);
            return Err(ServiceError::NotFound("User"));
        };

        match self.hasher.verify(&user.password_hash, password) {
            Ok(()) => {}
            Err(PasswordError::Mismatch) => {
                tracing::warn!(user_id = user.id, "Login rejected: wrong password");
                return Err(ServiceError::WrongCredentials);
            }
            Err(e) => return Err(e.into()),
        }

        let token = self.tokens.create_token(user.id)?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok(token)
    }

    /// Create an account and log it in.
    ///
    /// # Errors
    /// `UserExists` if the username is taken, `InvalidInput` for blank
    /// fields.
    pub fn register(
        &self,
        name: &str,
        username: &str,
        password: &str,
    ) -> ServiceResult<RegisteredUser> {
        require("name", name)?;
        require("username", username)?;
        require("password", password)?;

        if self.users.get_user_by_username(username)?.is_some() {
            return Err(ServiceError::UserExists);
        }

        let password_hash = self.hasher.hash(password)?;
        self.users
            .create_user(NewUser {
                name: name.to_string(),
                username: username.to_string(),
                password_hash,
            })
            .map_err(username_conflict)?;

        let user = self
            .users
            .get_user_by_username(username)?
            .ok_or(ServiceError::NotFound("User"))?;
        let token = self.tokens.create_token(user.id)?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(RegisteredUser { token, user })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{
        auth::{HmacTokenManager, TokenConfig},
        services::test_support::PlainHasher,
        storage::InMemoryStore,
    };

    struct Fixture {
        service: AuthService,
        users: Arc<InMemoryStore>,
        tokens: TokenHelper,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(InMemoryStore::new());
        let manager = HmacTokenManager::new(TokenConfig::new("auth-service-secret")).unwrap();
        let tokens = TokenHelper::new(Arc::new(manager));
        let service = AuthService::new(users.clone(), Arc::new(PlainHasher), tokens.clone());
        Fixture {
            service,
            users,
            tokens,
        }
    }

    #[test]
    fn register_then_login() {
        let fx = fixture();
        let registered = fx.service.register("Alice", "alice", "secret").unwrap();
        assert_eq!(registered.user.username, "alice");
        assert_eq!(
            fx.tokens.extract_subject(&registered.token).unwrap(),
            registered.user.id.to_string()
        );

        let token = fx.service.login("alice", "secret").unwrap();
        assert_eq!(
            fx.tokens.extract_subject(&token).unwrap(),
            registered.user.id.to_string()
        );
    }

    #[test]
    fn register_hashes_the_password() {
        let fx = fixture();
        fx.service.register("Alice", "alice", "secret").unwrap();
        let stored = fx.users.get_user_by_username("alice").unwrap().unwrap();
        assert_eq!(stored.password_hash, "plain:secret");
    }

    #[test]
    fn wrong_password_is_wrong_credentials() {
        let fx = fixture();
        fx.service.register("Alice", "alice", "secret").unwrap();
        assert!(matches!(
            fx.service.login("alice", "nope"),
            Err(ServiceError::WrongCredentials)
        ));
    }

    #[test]
    fn unknown_user_is_not_found() {
        let fx = fixture();
        fx.service.register("Alice", "alice", "secret").unwrap();
        assert!(matches!(
            fx.service.login("bob", "x"),
            Err(ServiceError::NotFound("User"))
        ));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let fx = fixture();
        fx.service.register("Alice", "alice", "secret").unwrap();
        assert!(matches!(
            fx.service.register("Other Alice", "alice", "other"),
            Err(ServiceError::UserExists)
        ));
        assert_eq!(fx.users.list_users().unwrap().len(), 1);
    }

    #[test]
    fn blank_fields_are_invalid() {
        let fx = fixture();
        assert!(matches!(
            fx.service.register("Alice", " ", "secret"),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            fx.service.login("alice", ""),
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn corrupt_stored_hash_is_internal() {
        let fx = fixture();
        fx.users
            .create_user(NewUser {
                name: "Alice".to_string(),
                username: "alice".to_string(),
                password_hash: "garbage".to_string(),
            })
            .unwrap();
        assert!(matches!(
            fx.service.login("alice", "secret"),
            Err(ServiceError::Password(PasswordError::Hash(_)))
        ));
    }

    /// Counts every key derivation, hashing or verifying.
    #[derive(Default)]
    struct CountingHasher {
        derivations: AtomicUsize,
    }

    impl PasswordCrypto for CountingHasher {
        fn hash(&self, password: &str) -> Result<String, PasswordError> {
            self.derivations.fetch_add(1, Ordering::SeqCst);
            PlainHasher.hash(password)
        }

        fn verify(&self, hash: &str, password: &str) -> Result<(), PasswordError> {
            self.derivations.fetch_add(1, Ordering::SeqCst);
            PlainHasher.verify(hash, password)
        }
    }

    #[test]
    fn unknown_user_costs_one_key_derivation() {
        let users = Arc::new(InMemoryStore::new());
        let hasher = Arc::new(CountingHasher::default());
        let manager = HmacTokenManager::new(TokenConfig::new("auth-service-secret")).unwrap();
        let service = AuthService::new(
            users,
            hasher.clone(),
            TokenHelper::new(Arc::new(manager)),
        );

        service.register("Alice", "alice", "secret").unwrap();
        hasher.derivations.store(0, Ordering::SeqCst);

        assert!(matches!(
            service.login("alice", "wrong"),
            Err(ServiceError::WrongCredentials)
        ));
        assert_eq!(hasher.derivations.load(Ordering::SeqCst), 1);

        assert!(matches!(
            service.login("bob", "wrong"),
            Err(ServiceError::NotFound("User"))
        ));
        assert_eq!(hasher.derivations.load(Ordering::SeqCst), 2);
    }
}
