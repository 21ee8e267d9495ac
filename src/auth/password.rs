// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing and verification.
//!
//! Passwords are hashed with Argon2id and stored as PHC strings, which embed
//! the salt and cost parameters next to the digest.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
    Argon2,
};

/// Password hashing errors.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// The password does not match the stored hash. This is an expected
    /// outcome of a login attempt, not a fault.
    #[error("password does not match")]
    Mismatch,

    /// Hashing failed or the stored hash could not be parsed.
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// One-way password hashing.
///
/// Services depend on this trait so tests can substitute a cheap double for
/// the real key-derivation function.
pub trait PasswordCrypto: Send + Sync {
    /// Hash `password` with a fresh random salt.
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Check `password` against a hash produced by [`PasswordCrypto::hash`].
    ///
    /// # Errors
    /// Returns `PasswordError::Mismatch` if the password is wrong.
    fn verify(&self, hash: &str, password: &str) -> Result<(), PasswordError>;
}

/// Argon2id hasher with the crate's default parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordCrypto for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hash(format!("failed to hash password: {e}")))
    }

    fn verify(&self, hash: &str, password: &str) -> Result<(), PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::Hash(format!("invalid password hash format: {e}")))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(()),
            Err(argon2::password_hash::Error::Password) => Err(PasswordError::Mismatch),
            Err(e) => Err(PasswordError::Hash(format!("failed to verify password: {e}"))),
        }
    }
}
