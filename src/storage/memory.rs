// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory store for tests and ephemeral runs.
//!
//! Same semantics as [`super::Database`], nothing survives the process.

use std::{
    collections::BTreeMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::Utc;

use super::{PostStore, StorageError, StorageResult, UserStore};
use crate::models::{NewPost, NewUser, Post, User};

#[derive(Default)]
struct Tables {
    users: BTreeMap<u64, User>,
    posts: BTreeMap<u64, Post>,
    last_user_id: u64,
    last_post_id: u64,
}

impl Tables {
    fn username_taken(&self, username: &str, except: Option<u64>) -> bool {
        self.users
            .values()
            .any(|u| !u.is_deleted() && u.username == username && Some(u.id) != except)
    }

    fn live_user_mut(&mut self, id: u64) -> StorageResult<&mut User> {
        self.users
            .get_mut(&id)
            .filter(|u| !u.is_deleted())
            .ok_or_else(|| StorageError::NotFound(format!("user {id}")))
    }

    fn live_post_mut(&mut self, id: u64) -> StorageResult<&mut Post> {
        self.posts
            .get_mut(&id)
            .filter(|p| !p.is_deleted())
            .ok_or_else(|| StorageError::NotFound(format!("post {id}")))
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| StorageError::Poisoned)
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| StorageError::Poisoned)
    }
}

impl UserStore for InMemoryStore {
    fn get_user(&self, id: u64) -> StorageResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .get(&id)
            .filter(|u| !u.is_deleted())
            .cloned())
    }

    fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| !u.is_deleted() && u.username == username)
            .cloned())
    }

    fn list_users(&self) -> StorageResult<Vec<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .filter(|u| !u.is_deleted())
            .cloned()
            .collect())
    }

    fn create_user(&self, new: NewUser) -> StorageResult<User> {
        let mut tables = self.write()?;
        if tables.username_taken(&new.username, None) {
            return Err(StorageError::AlreadyExists(format!(
                "username {}",
                new.username
            )));
        }

        tables.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.last_user_id,
            name: new.name,
            username: new.username,
            password_hash: new.password_hash,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn update_user(&self, user: &User) -> StorageResult<User> {
        let mut tables = self.write()?;
        tables.live_user_mut(user.id)?;
        if tables.username_taken(&user.username, Some(user.id)) {
            return Err(StorageError::AlreadyExists(format!(
                "username {}",
                user.username
            )));
        }

        let stored = tables.live_user_mut(user.id)?;
        stored.name = user.name.clone();
        stored.username = user.username.clone();
        stored.password_hash = user.password_hash.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    fn delete_user(&self, id: u64) -> StorageResult<()> {
        let mut tables = self.write()?;
        let user = tables.live_user_mut(id)?;
        let now = Utc::now();
        user.deleted_at = Some(now);
        user.updated_at = now;
        Ok(())
    }
}

impl PostStore for InMemoryStore {
    fn get_post(&self, id: u64) -> StorageResult<Option<Post>> {
        Ok(self
            .read()?
            .posts
            .get(&id)
            .filter(|p| !p.is_deleted())
            .cloned())
    }

    fn list_posts(&self) -> StorageResult<Vec<Post>> {
        Ok(self
            .read()?
            .posts
            .values()
            .filter(|p| !p.is_deleted())
            .cloned()
            .collect())
    }

    fn create_post(&self, new: NewPost) -> StorageResult<Post> {
        let mut tables = self.write()?;
        tables.last_post_id += 1;
        let now = Utc::now();
        let post = Post {
            id: tables.last_post_id,
            title: new.title,
            body: new.body,
            owner_id: new.owner_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    fn update_post(&self, post: &Post) -> StorageResult<Post> {
        let mut tables = self.write()?;
        let stored = tables.live_post_mut(post.id)?;
        stored.title = post.title.clone();
        stored.body = post.body.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    fn delete_post(&self, id: u64) -> StorageResult<()> {
        let mut tables = self.write()?;
        let post = tables.live_post_mut(id)?;
        let now = Utc::now();
        post.deleted_at = Some(now);
        post.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use super::*;

    #[test]
    fn concurrent_creates_allocate_distinct_ids() {
        let store = Arc::new(InMemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                thread::spawn(move || {
                    store
                        .create_post(NewPost {
                            title: format!("post {i}"),
                            body: "body".to_string(),
                            owner_id: 1,
                        })
                        .unwrap()
                        .id
                })
            })
            .collect();

        let mut ids: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn poisoned_lock_surfaces_as_error() {
        let store = Arc::new(InMemoryStore::new());
        let poisoner = store.clone();
        let _ = thread::spawn(move || {
            let _guard = poisoner.tables.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(store.list_posts(), Err(StorageError::Poisoned)));
    }
}
