// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::Request,
    http::HeaderName,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::require_auth,
    models::{
        CreatePostRequest, LoginRequest, MessageResponse, PostResponse, RegisterRequest,
        RegisterResponse, TokenResponse, UpdatePostRequest, UpdateUserRequest, UserResponse,
    },
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod posts;
pub mod users;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/users", get(users::list_users))
        .route("/users/{id}", get(users::get_user))
        .route(
            "/users/by-username/{username}",
            get(users::get_user_by_username),
        )
        .route("/posts", get(posts::list_posts))
        .route("/posts/{id}", get(posts::get_post));

    let protected = Router::new()
        .route("/users/me", get(users::get_current_user))
        .route(
            "/users/{id}",
            put(users::update_user).delete(users::delete_user),
        )
        .route("/posts", post(posts::create_post))
        .route(
            "/posts/{id}",
            put(posts::update_post).delete(posts::delete_post),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .nest("/api", public.merge(protected))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            MakeRequestUuid,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Send as `Authorization: bearer:<token>`"))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::register,
        users::list_users,
        users::get_current_user,
        users::get_user,
        users::get_user_by_username,
        users::update_user,
        users::delete_user,
        posts::list_posts,
        posts::get_post,
        posts::create_post,
        posts::update_post,
        posts::delete_post,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            LoginRequest,
            TokenResponse,
            RegisterRequest,
            RegisterResponse,
            UserResponse,
            UpdateUserRequest,
            PostResponse,
            CreatePostRequest,
            UpdatePostRequest,
            MessageResponse,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "Auth", description = "Login and registration"),
        (name = "Users", description = "Accounts"),
        (name = "Posts", description = "Blog posts"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
