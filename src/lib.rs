// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Simple CRUD Blog - REST API with bearer-token authentication
//!
//! Users register and log in to obtain a signed bearer token, then publish,
//! edit and delete their own posts. Everyone can read.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and router (Axum)
//! - `auth` - Password hashing, token issuance and the auth middleware
//! - `services` - Login, registration and ownership rules
//! - `storage` - redb and in-memory stores

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
