// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Validates the bearer token on every request routed through it and stores
//! the caller as an [`AuthenticatedUser`] request extension. Handlers read
//! it with the [`super::Auth`] extractor.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/posts", post(create_post))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         state.tokens.clone(),
//!         require_auth,
//!     ));
//! ```

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{helper::TokenHelper, token::TokenError, AuthError, AuthenticatedUser};

/// Prefix clients put in front of the token: `Authorization: bearer:<token>`.
const BEARER_PREFIX: &str = "bearer:";

/// Standard RFC 6750 scheme, accepted as well.
const BEARER_SCHEME: &str = "bearer ";

/// Authentication middleware function.
pub async fn require_auth(
    State(tokens): State<TokenHelper>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&tokens, &request) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

fn authenticate(tokens: &TokenHelper, request: &Request) -> Result<AuthenticatedUser, AuthError> {
    let auth_str = match request.headers().get(AUTHORIZATION) {
        Some(header) => header.to_str().map_err(|_| AuthError::InvalidAuthHeader)?,
        None => return Err(AuthError::MissingAuthHeader),
    };

    if auth_str.trim().is_empty() {
        return Err(AuthError::MissingAuthHeader);
    }

    let token = strip_bearer(auth_str).ok_or(AuthError::InvalidAuthHeader)?;

    match tokens.check_token(token) {
        Ok(()) => {}
        Err(TokenError::InvalidKey) => {
            tracing::debug!("Rejected bearer token");
            return Err(AuthError::InvalidToken);
        }
        Err(e) => return Err(AuthError::InternalError(e.to_string())),
    }

    let subject = tokens
        .extract_subject(token)
        .map_err(|e| AuthError::InternalError(e.to_string()))?;

    Ok(AuthenticatedUser::new(subject))
}

/// Strip `bearer:` (or `Bearer `) from a header value, case-insensitively.
///
/// Returns `None` for any other format or an empty token.
fn strip_bearer(value: &str) -> Option<&str> {
    let value = value.trim();

    let token = [BEARER_PREFIX, BEARER_SCHEME].iter().find_map(|prefix| {
        let head = value.get(..prefix.len())?;
        if head.eq_ignore_ascii_case(prefix) {
            value.get(prefix.len()..)
        } else {
            None
        }
    })?;

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use chrono::Duration;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::{
        token::{HmacTokenManager, TokenConfig},
        Auth,
    };

    const SECRET: &str = "middleware-test-secret-of-sufficient-length";

    fn helper_with(config: TokenConfig) -> TokenHelper {
        TokenHelper::new(Arc::new(HmacTokenManager::new(config).unwrap()))
    }

    fn helper() -> TokenHelper {
        helper_with(TokenConfig::new(SECRET))
    }

    /// Router whose handler echoes the caller's subject and counts its calls.
    fn app(calls: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/whoami",
                get(move |Auth(user): Auth| {
                    let calls = calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        user.subject
                    }
                }),
            )
            .route_layer(from_fn_with_state(helper(), require_auth))
    }

    async fn send(header: Option<&str>) -> (StatusCode, String, usize) {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }

        let response = app(calls.clone())
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (
            status,
            String::from_utf8(bytes.to_vec()).unwrap(),
            calls.load(Ordering::SeqCst),
        )
    }

    #[tokio::test]
    async fn missing_header_is_rejected_before_handler() {
        let (status, body, calls) = send(None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Missing authentication"));
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn empty_header_counts_as_missing() {
        let (status, body, calls) = send(Some("")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Missing authentication"));
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_subject() {
        let token = helper().create_token(42).unwrap();
        let (status, body, calls) = send(Some(format!("bearer:{token}").as_str())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "42");
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn standard_bearer_scheme_is_accepted() {
        let token = helper().create_token(7).unwrap();
        let (status, body, _) = send(Some(format!("Bearer {token}").as_str())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "7");
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let token = helper_with(TokenConfig::new(SECRET).with_ttl(Duration::hours(-2)))
            .create_token(42)
            .unwrap();
        let (status, body, calls) = send(Some(format!("bearer:{token}").as_str())).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Invalid token"));
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn token_from_other_secret_is_rejected() {
        let token = helper_with(TokenConfig::new("some-other-secret-of-sufficient-length"))
            .create_token(42)
            .unwrap();
        let (status, _, calls) = send(Some(format!("bearer:{token}").as_str())).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn malformed_token_is_an_internal_error() {
        let (status, body, calls) = send(Some("bearer:not-a-jwt")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("not-a-jwt"));
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn unknown_scheme_is_rejected() {
        let token = helper().create_token(42).unwrap();
        let (status, body, _) = send(Some(format!("Basic {token}").as_str())).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("invalid_auth_header"));
    }

    #[test]
    fn strip_bearer_formats() {
        assert_eq!(strip_bearer("bearer:abc"), Some("abc"));
        assert_eq!(strip_bearer("BEARER:abc"), Some("abc"));
        assert_eq!(strip_bearer("Bearer abc"), Some("abc"));
        assert_eq!(strip_bearer("  bearer: abc  "), Some("abc"));
        assert_eq!(strip_bearer("bearer:"), None);
        assert_eq!(strip_bearer("abc"), None);
        assert_eq!(strip_bearer("Token abc"), None);
    }
}
