// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Domain-level token operations on top of a [`TokenManager`].

use std::sync::Arc;

use super::token::{TokenError, TokenManager};

/// Issues and checks tokens for user ids.
///
/// Holds the signing backend behind a trait object so the same helper works
/// with the HMAC manager in production and with doubles in tests.
#[derive(Clone)]
pub struct TokenHelper {
    manager: Arc<dyn TokenManager>,
}

impl TokenHelper {
    pub fn new(manager: Arc<dyn TokenManager>) -> Self {
        Self { manager }
    }

    /// Issue a token whose subject is `user_id` in decimal form.
    pub fn create_token(&self, user_id: u64) -> Result<String, TokenError> {
        self.manager.sign(&user_id.to_string())
    }

    /// Check that `token` is valid.
    ///
    /// # Errors
    /// - `TokenError::InvalidKey` if the token decoded but was rejected
    /// - any parse error if the token could not be decoded
    pub fn check_token(&self, token: &str) -> Result<(), TokenError> {
        let parsed = self.manager.parse(token)?;
        if !parsed.valid {
            return Err(TokenError::InvalidKey);
        }
        Ok(())
    }

    /// Return the subject of a valid token.
    pub fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        let parsed = self.manager.parse(token)?;
        if !parsed.valid {
            return Err(TokenError::InvalidKey);
        }

        parsed
            .claims
            .subject()
            .map(str::to_string)
            .ok_or(TokenError::MissingSubject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::{HmacTokenManager, ParsedToken, TokenClaims, TokenConfig};

    /// Double that returns canned parse results.
    struct FixedManager {
        claims: TokenClaims,
        valid: bool,
    }

    impl TokenManager for FixedManager {
        fn sign(&self, subject: &str) -> Result<String, TokenError> {
            Ok(format!("signed:{subject}"))
        }

        fn parse(&self, token: &str) -> Result<ParsedToken, TokenError> {
            if token == "garbage" {
                return Err(TokenError::Malformed("not a token".to_string()));
            }
            Ok(ParsedToken {
                claims: self.claims.clone(),
                valid: self.valid,
            })
        }
    }

    fn fixed(aud: &[&str], valid: bool) -> TokenHelper {
        TokenHelper::new(Arc::new(FixedManager {
            claims: TokenClaims {
                aud: aud.iter().map(|s| s.to_string()).collect(),
                iat: 0,
                exp: 0,
            },
            valid,
        }))
    }

    fn hmac(secret: &str) -> TokenHelper {
        TokenHelper::new(Arc::new(
            HmacTokenManager::new(TokenConfig::new(secret)).unwrap(),
        ))
    }

    #[test]
    fn create_token_uses_decimal_subject() {
        let helper = fixed(&[], true);
        assert_eq!(helper.create_token(17).unwrap(), "signed:17");
    }

    #[test]
    fn subject_round_trips_through_real_tokens() {
        let helper = hmac("round-trip-secret-of-sufficient-length");
        let token = helper.create_token(1234).unwrap();

        assert!(helper.check_token(&token).is_ok());
        assert_eq!(helper.extract_subject(&token).unwrap(), "1234");
    }

    #[test]
    fn invalid_token_is_distinct_from_parse_error() {
        let helper = fixed(&["1"], false);
        assert!(matches!(helper.check_token("t"), Err(TokenError::InvalidKey)));
        assert!(matches!(
            helper.check_token("garbage"),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn foreign_secret_yields_invalid_key() {
        let token = hmac("first-secret-of-sufficient-length").create_token(5).unwrap();
        let result = hmac("second-secret-of-sufficient-length").check_token(&token);
        assert!(matches!(result, Err(TokenError::InvalidKey)));
    }

    #[test]
    fn extract_subject_requires_audience() {
        let helper = fixed(&[], true);
        assert!(matches!(
            helper.extract_subject("t"),
            Err(TokenError::MissingSubject)
        ));
    }

    #[test]
    fn extract_subject_returns_first_audience() {
        let helper = fixed(&["3", "4"], true);
        assert_eq!(helper.extract_subject("t").unwrap(), "3");
    }

    #[test]
    fn extract_subject_rejects_invalid_tokens() {
        let helper = fixed(&["3"], false);
        assert!(matches!(
            helper.extract_subject("t"),
            Err(TokenError::InvalidKey)
        ));
    }
}
