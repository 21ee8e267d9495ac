// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Password hashing and bearer-token authentication for the blog API.
//!
//! ## Auth Flow
//!
//! 1. Client logs in (or registers) and receives an HS256-signed token whose
//!    audience claim holds the user id
//! 2. Client sends `Authorization: bearer:<token>`
//! 3. Server:
//!    - Verifies the signature against the shared secret and checks expiry
//!    - Extracts the subject (user id)
//!    - Hands it to the handler as an [`AuthenticatedUser`]
//!
//! ## Security
//!
//! - Passwords are stored as salted Argon2id hashes
//! - Tokens are stateless and expire 7 days after issue; there is no
//!   revocation
//! - A token is rejected from its expiry second onward, with no clock skew
//!   tolerance

pub mod claims;
pub mod error;
pub mod extractor;
pub mod helper;
pub mod middleware;
pub mod password;
pub mod token;

pub use claims::AuthenticatedUser;
pub use error::AuthError;
pub use extractor::Auth;
pub use helper::TokenHelper;
pub use middleware::require_auth;
pub use password::{Argon2Hasher, PasswordCrypto, PasswordError};
pub use token::{HmacTokenManager, ParsedToken, TokenClaims, TokenConfig, TokenError, TokenManager};
