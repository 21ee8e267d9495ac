// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed bearer tokens.
//!
//! [`TokenManager`] signs and parses raw tokens carrying a single subject.
//! [`HmacTokenManager`] is the production backend: HS256 JWTs keyed with the
//! shared secret from [`TokenConfig`]. Domain-level operations (tokens for a
//! user id) live in [`super::helper::TokenHelper`].

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Deserializer, Serialize};

/// Token lifetime: 7 days.
pub const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Token errors.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// No signing secret configured.
    #[error("token signing secret is not configured")]
    MissingSecret,

    /// The token could not be signed.
    #[error("failed to sign token: {0}")]
    Signing(String),

    /// The token is not a structurally valid JWT.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The token is well-formed but was rejected (bad signature or expired).
    #[error("token key is invalid")]
    InvalidKey,

    /// The token carries no subject.
    #[error("token has no subject")]
    MissingSubject,
}

/// Claims carried by every token.
///
/// The subject is stored in the audience claim. Tokens issued by older
/// deployments carry it as a bare string, newer ones as a one-element list;
/// both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default, deserialize_with = "string_or_list")]
    pub aud: Vec<String>,
    /// Issued at (Unix seconds).
    pub iat: i64,
    /// Expiration (Unix seconds).
    pub exp: i64,
}

impl TokenClaims {
    pub fn subject(&self) -> Option<&str> {
        self.aud.first().map(String::as_str)
    }
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

/// Result of parsing a token.
///
/// `valid` is false when the token decoded cleanly but its signature or
/// validity window was rejected.
#[derive(Debug, Clone)]
pub struct ParsedToken {
    pub claims: TokenClaims,
    pub valid: bool,
}

/// Signs and parses raw tokens.
pub trait TokenManager: Send + Sync {
    /// Issue a token for `subject`, valid for [`TOKEN_TTL_SECS`].
    fn sign(&self, subject: &str) -> Result<String, TokenError>;

    /// Decode `token` and report whether it is valid.
    ///
    /// # Errors
    /// Returns `TokenError::Malformed` if the token cannot be decoded at all.
    fn parse(&self, token: &str) -> Result<ParsedToken, TokenError>;
}

/// Token signing configuration.
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::seconds(TOKEN_TTL_SECS),
        }
    }

    /// Override the token lifetime.
    #[cfg(test)]
    pub(crate) fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// HS256 token manager.
pub struct HmacTokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl HmacTokenManager {
    /// Build a manager from `config`.
    ///
    /// # Errors
    /// Returns `TokenError::MissingSecret` if the secret is empty.
    pub fn new(config: TokenConfig) -> Result<Self, TokenError> {
        if config.secret.trim().is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // A token is valid strictly before `exp`, with no grace period.
        validation.leeway = 0;
        // The audience carries the subject, there is no fixed audience to match.
        validation.validate_aud = false;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            ttl: config.ttl,
        })
    }
}

impl TokenManager for HmacTokenManager {
    fn sign(&self, subject: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = TokenClaims {
            aud: vec![subject.to_string()],
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    fn parse(&self, token: &str) -> Result<ParsedToken, TokenError> {
        match decode::<TokenClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => {
                // The decoder still accepts `exp == now`.
                let valid = data.claims.exp > Utc::now().timestamp();
                Ok(ParsedToken {
                    claims: data.claims,
                    valid,
                })
            }
            Err(e) => match e.kind() {
                ErrorKind::InvalidSignature
                | ErrorKind::ExpiredSignature
                | ErrorKind::ImmatureSignature
                | ErrorKind::InvalidAlgorithm => {
                    // Well-formed but rejected: still surface the claims.
                    let data = jsonwebtoken::dangerous::insecure_decode::<TokenClaims>(token)
                        .map_err(|e| TokenError::Malformed(e.to_string()))?;
                    Ok(ParsedToken {
                        claims: data.claims,
                        valid: false,
                    })
                }
                _ => Err(TokenError::Malformed(e.to_string())),
            },
        }
    }
}
