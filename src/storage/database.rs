// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded blog database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user id → serialized User (JSON bytes)
//! - `usernames`: username → user id, live accounts only
//! - `posts`: post id → serialized Post (JSON bytes)
//! - `sequences`: sequence name → last allocated id

use std::path::Path;

use chrono::Utc;
use redb::{ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use serde::{de::DeserializeOwned, Serialize};

use super::{PostStore, StorageError, StorageResult, UserStore};
use crate::models::{NewPost, NewUser, Post, User};

// =============================================================================
// Table Definitions
// =============================================================================

const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");

/// Index: username → user id. Entries are removed on soft delete.
const USERNAMES: TableDefinition<&str, u64> = TableDefinition::new("usernames");

const POSTS: TableDefinition<u64, &[u8]> = TableDefinition::new("posts");

/// Id allocation: sequence name → last id handed out.
const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

const USER_SEQUENCE: &str = "users";
const POST_SEQUENCE: &str = "posts";

// =============================================================================
// Helpers
// =============================================================================

fn encode<T: Serialize>(record: &T) -> StorageResult<Vec<u8>> {
    Ok(serde_json::to_vec(record)?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StorageResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Bump and return the named sequence inside an open write transaction.
fn next_id(txn: &WriteTransaction, sequence: &str) -> StorageResult<u64> {
    let mut table = txn.open_table(SEQUENCES)?;
    let next = table.get(sequence)?.map(|v| v.value()).unwrap_or(0) + 1;
    table.insert(sequence, next)?;
    Ok(next)
}

fn user_not_found(id: u64) -> StorageError {
    StorageError::NotFound(format!("user {id}"))
}

fn post_not_found(id: u64) -> StorageError {
    StorageError::NotFound(format!("post {id}"))
}

// =============================================================================
// Database
// =============================================================================

/// Embedded ACID store for accounts and posts.
pub struct Database {
    db: redb::Database,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = redb::Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USERNAMES)?;
            let _ = write_txn.open_table(POSTS)?;
            let _ = write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;

        tracing::debug!(path = %path.display(), "Opened blog database");
        Ok(Self { db })
    }

    /// Load a live user inside a write transaction.
    fn live_user(txn: &WriteTransaction, id: u64) -> StorageResult<User> {
        let table = txn.open_table(USERS)?;
        let user: User = match table.get(id)? {
            Some(value) => decode(value.value())?,
            None => return Err(user_not_found(id)),
        };
        if user.is_deleted() {
            return Err(user_not_found(id));
        }
        Ok(user)
    }

    fn live_post(txn: &WriteTransaction, id: u64) -> StorageResult<Post> {
        let table = txn.open_table(POSTS)?;
        let post: Post = match table.get(id)? {
            Some(value) => decode(value.value())?,
            None => return Err(post_not_found(id)),
        };
        if post.is_deleted() {
            return Err(post_not_found(id));
        }
        Ok(post)
    }
}

// =============================================================================
// Users
// =============================================================================

impl UserStore for Database {
    fn get_user(&self, id: u64) -> StorageResult<Option<User>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        let user: Option<User> = match table.get(id)? {
            Some(value) => Some(decode(value.value())?),
            None => None,
        };
        Ok(user.filter(|user| !user.is_deleted()))
    }

    fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        let id = {
            let read_txn = self.db.begin_read()?;
            let index = read_txn.open_table(USERNAMES)?;
            let id = index.get(username)?.map(|v| v.value());
            id
        };
        match id {
            Some(id) => self.get_user(id),
            None => Ok(None),
        }
    }

    fn list_users(&self) -> StorageResult<Vec<User>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        let mut users = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let user: User = decode(value.value())?;
            if !user.is_deleted() {
                users.push(user);
            }
        }
        Ok(users)
    }

    fn create_user(&self, new: NewUser) -> StorageResult<User> {
        let write_txn = self.db.begin_write()?;
        let user = {
            let mut usernames = write_txn.open_table(USERNAMES)?;
            if usernames.get(new.username.as_str())?.is_some() {
                return Err(StorageError::AlreadyExists(format!(
                    "username {}",
                    new.username
                )));
            }

            let id = next_id(&write_txn, USER_SEQUENCE)?;
            let now = Utc::now();
            let user = User {
                id,
                name: new.name,
                username: new.username,
                password_hash: new.password_hash,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            };

            let mut users = write_txn.open_table(USERS)?;
            users.insert(id, encode(&user)?.as_slice())?;
            usernames.insert(user.username.as_str(), id)?;
            user
        };
        write_txn.commit()?;
        Ok(user)
    }

    fn update_user(&self, user: &User) -> StorageResult<User> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let current = Self::live_user(&write_txn, user.id)?;

            if current.username != user.username {
                let mut usernames = write_txn.open_table(USERNAMES)?;
                let holder = usernames.get(user.username.as_str())?.map(|v| v.value());
                if holder.is_some_and(|holder| holder != user.id) {
                    return Err(StorageError::AlreadyExists(format!(
                        "username {}",
                        user.username
                    )));
                }
                usernames.remove(current.username.as_str())?;
                usernames.insert(user.username.as_str(), user.id)?;
            }

            let updated = User {
                name: user.name.clone(),
                username: user.username.clone(),
                password_hash: user.password_hash.clone(),
                updated_at: Utc::now(),
                ..current
            };
            let mut users = write_txn.open_table(USERS)?;
            users.insert(updated.id, encode(&updated)?.as_slice())?;
            updated
        };
        write_txn.commit()?;
        Ok(updated)
    }

    fn delete_user(&self, id: u64) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut user = Self::live_user(&write_txn, id)?;
            let now = Utc::now();
            user.deleted_at = Some(now);
            user.updated_at = now;

            let mut users = write_txn.open_table(USERS)?;
            users.insert(id, encode(&user)?.as_slice())?;
            let mut usernames = write_txn.open_table(USERNAMES)?;
            usernames.remove(user.username.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

// =============================================================================
// Posts
// =============================================================================

impl PostStore for Database {
    fn get_post(&self, id: u64) -> StorageResult<Option<Post>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(POSTS)?;
        let post: Option<Post> = match table.get(id)? {
            Some(value) => Some(decode(value.value())?),
            None => None,
        };
        Ok(post.filter(|post| !post.is_deleted()))
    }

    fn list_posts(&self) -> StorageResult<Vec<Post>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(POSTS)?;
        let mut posts = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let post: Post = decode(value.value())?;
            if !post.is_deleted() {
                posts.push(post);
            }
        }
        Ok(posts)
    }

    fn create_post(&self, new: NewPost) -> StorageResult<Post> {
        let write_txn = self.db.begin_write()?;
        let post = {
            let id = next_id(&write_txn, POST_SEQUENCE)?;
            let now = Utc::now();
            let post = Post {
                id,
                title: new.title,
                body: new.body,
                owner_id: new.owner_id,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            };
            let mut posts = write_txn.open_table(POSTS)?;
            posts.insert(id, encode(&post)?.as_slice())?;
            post
        };
        write_txn.commit()?;
        Ok(post)
    }

    fn update_post(&self, post: &Post) -> StorageResult<Post> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let current = Self::live_post(&write_txn, post.id)?;
            let updated = Post {
                title: post.title.clone(),
                body: post.body.clone(),
                updated_at: Utc::now(),
                ..current
            };
            let mut posts = write_txn.open_table(POSTS)?;
            posts.insert(updated.id, encode(&updated)?.as_slice())?;
            updated
        };
        write_txn.commit()?;
        Ok(updated)
    }

    fn delete_post(&self, id: u64) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut post = Self::live_post(&write_txn, id)?;
            let now = Utc::now();
            post.deleted_at = Some(now);
            post.updated_at = now;

            let mut posts = write_txn.open_table(POSTS)?;
            posts.insert(id, encode(&post)?.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}
