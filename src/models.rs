// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Data Models
//!
//! Stored records and the request/response structures of the REST API.
//! Request and response types derive `ToSchema` so they show up in the
//! OpenAPI document served at `/docs`.
//!
//! ## Model Categories
//!
//! - **Stored records**: [`User`] and [`Post`], as persisted by the stores
//! - **Users**: profile responses and update requests
//! - **Posts**: post responses and create/update requests
//! - **Auth**: login and registration payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Stored Records
// =============================================================================

/// A registered account.
///
/// The password hash is persisted with the record but never leaves the
/// service layer; API responses use [`UserResponse`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the account is soft-deleted.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Fields needed to insert a new account. The store assigns the id and
/// timestamps.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub password_hash: String,
}

/// A blog post owned by the user who created it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub owner_id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Fields needed to insert a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub owner_id: u64,
}

// =============================================================================
// User Models
// =============================================================================

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserResponse {
    /// Numeric account identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Unique login name.
    pub username: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last modified.
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Request to update the caller's own profile.
///
/// Missing or blank fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New login name (must not be taken by another account).
    #[serde(default)]
    pub username: Option<String>,
    /// New password.
    #[serde(default)]
    pub password: Option<String>,
}

// =============================================================================
// Post Models
// =============================================================================

/// A post together with its author.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PostResponse {
    /// Numeric post identifier.
    pub id: u64,
    /// Post title.
    pub title: String,
    /// Post content.
    pub body: String,
    /// Author of the post, absent if the account has been deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<UserResponse>,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
    /// When the post was last modified.
    pub updated_at: DateTime<Utc>,
}

impl PostResponse {
    pub fn new(post: Post, author: Option<User>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            body: post.body,
            author: author.map(UserResponse::from),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Request to publish a new post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    /// Post title (required).
    pub title: String,
    /// Post content (required).
    pub body: String,
}

/// Request to edit a post. Missing or blank fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdatePostRequest {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New content.
    #[serde(default)]
    pub body: Option<String>,
}

// =============================================================================
// Auth Models
// =============================================================================

/// Credentials for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Issued bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Signed token; send it back as `Authorization: bearer:<token>`.
    pub token: String,
}

/// Payload for `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub password: String,
}

/// Result of a successful registration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    /// Bearer token for the new account.
    pub token: String,
    /// The account that was created.
    pub user: UserResponse,
}

/// Plain acknowledgement for mutations that return no data.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
