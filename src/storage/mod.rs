// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistence for accounts and posts behind two traits, [`UserStore`] and
//! [`PostStore`], so services never depend on a concrete backend.
//!
//! ## Backends
//!
//! - [`Database`]: embedded redb file (`$DATA_DIR/blog.redb`), used by the
//!   server
//! - [`InMemoryStore`]: process-local maps, used by tests and throwaway runs
//!
//! ## Contract
//!
//! - Ids are allocated by the store, starting at 1, never reused
//! - Deletes are soft: the record keeps a `deleted_at` timestamp and
//!   disappears from every lookup and listing
//! - Usernames are unique among live accounts; a deleted account releases
//!   its username
//! - Lookups return `Ok(None)` for absent or deleted rows, mutations return
//!   [`StorageError::NotFound`]

pub mod database;
pub mod memory;
pub mod ownership;

pub use database::Database;
pub use memory::InMemoryStore;
pub use ownership::{OwnedResource, OwnershipCheck, OwnershipEnforcer, OwnershipError, ResourceKind};

use crate::models::{NewPost, NewUser, Post, User};

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Store Traits
// =============================================================================

/// Account persistence.
pub trait UserStore: Send + Sync {
    fn get_user(&self, id: u64) -> StorageResult<Option<User>>;

    fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>>;

    /// Live accounts in id order.
    fn list_users(&self) -> StorageResult<Vec<User>>;

    /// Insert a new account.
    ///
    /// # Errors
    /// `AlreadyExists` if a live account holds the username.
    fn create_user(&self, user: NewUser) -> StorageResult<User>;

    /// Replace the name, username and password hash of an existing account.
    ///
    /// `created_at` is preserved and `updated_at` is stamped by the store.
    ///
    /// # Errors
    /// `NotFound` for an absent or deleted account, `AlreadyExists` if the
    /// new username belongs to another live account.
    fn update_user(&self, user: &User) -> StorageResult<User>;

    /// Soft-delete an account and release its username.
    fn delete_user(&self, id: u64) -> StorageResult<()>;
}

/// Post persistence.
pub trait PostStore: Send + Sync {
    fn get_post(&self, id: u64) -> StorageResult<Option<Post>>;

    /// Live posts in id order.
    fn list_posts(&self) -> StorageResult<Vec<Post>>;

    fn create_post(&self, post: NewPost) -> StorageResult<Post>;

    /// Replace title and body. The owner never changes.
    fn update_post(&self, post: &Post) -> StorageResult<Post>;

    fn delete_post(&self, id: u64) -> StorageResult<()>;
}
