// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    auth::{
        Argon2Hasher, HmacTokenManager, PasswordCrypto, TokenConfig, TokenError, TokenHelper,
    },
    services::{AuthService, PostService, UserService},
    storage::{InMemoryStore, PostStore, UserStore},
};

/// Shared, read-only application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub posts: Arc<dyn PostStore>,
    pub hasher: Arc<dyn PasswordCrypto>,
    pub tokens: TokenHelper,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        hasher: Arc<dyn PasswordCrypto>,
        tokens: TokenHelper,
    ) -> Self {
        Self {
            users,
            posts,
            hasher,
            tokens,
        }
    }

    /// Wire a single store that holds both users and posts, with Argon2
    /// hashing and HMAC tokens.
    pub fn with_store<S>(store: Arc<S>, token_config: TokenConfig) -> Result<Self, TokenError>
    where
        S: UserStore + PostStore + 'static,
    {
        let tokens = TokenHelper::new(Arc::new(HmacTokenManager::new(token_config)?));
        Ok(Self::new(
            store.clone(),
            store,
            Arc::new(Argon2Hasher::new()),
            tokens,
        ))
    }

    /// Fresh in-memory state.
    pub fn in_memory(secret: &str) -> Result<Self, TokenError> {
        Self::with_store(Arc::new(InMemoryStore::new()), TokenConfig::new(secret))
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(self.users.clone(), self.hasher.clone(), self.tokens.clone())
    }

    pub fn user_service(&self) -> UserService {
        UserService::new(self.users.clone(), self.hasher.clone())
    }

    pub fn post_service(&self) -> PostService {
        PostService::new(self.posts.clone(), self.users.clone())
    }
}

impl FromRef<AppState> for TokenHelper {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
