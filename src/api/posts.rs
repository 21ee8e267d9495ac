// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Post endpoints. Reads are public, writes need a bearer token and are
//! limited to the post's author.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{CreatePostRequest, MessageResponse, PostResponse, UpdatePostRequest},
    services::caller_id,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "Posts",
    responses((status = 200, body = [PostResponse]))
)]
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = state.post_service().list_posts()?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = u64, Path, description = "Post id")),
    tag = "Posts",
    responses(
        (status = 200, body = PostResponse),
        (status = 404, description = "No such post"),
    )
)]
pub async fn get_post(
    Path(id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<PostResponse>, ApiError> {
    Ok(Json(state.post_service().get_post(id)?.into()))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    tag = "Posts",
    security(("bearer" = [])),
    responses(
        (status = 201, body = PostResponse),
        (status = 400, description = "Missing title or body"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    Auth(user): Auth,
    Json(request): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let caller = caller_id(&user)?;
    let created = state
        .post_service()
        .create_post(caller, &request.title, &request.body)?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    params(("id" = u64, Path, description = "Post id")),
    request_body = UpdatePostRequest,
    tag = "Posts",
    security(("bearer" = [])),
    responses(
        (status = 200, body = PostResponse),
        (status = 401, description = "Caller is not the author"),
        (status = 404, description = "No such post"),
    )
)]
pub async fn update_post(
    Path(id): Path<u64>,
    State(state): State<AppState>,
    Auth(user): Auth,
    Json(request): Json<UpdatePostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let caller = caller_id(&user)?;
    let service = state.post_service();
    service.update_post(caller, id, request)?;
    Ok(Json(service.get_post(id)?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = u64, Path, description = "Post id")),
    tag = "Posts",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 401, description = "Caller is not the author"),
        (status = 404, description = "No such post"),
    )
)]
pub async fn delete_post(
    Path(id): Path<u64>,
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<MessageResponse>, ApiError> {
    let caller = caller_id(&user)?;
    state.post_service().delete_post(caller, id)?;
    Ok(Json(MessageResponse::new("Post deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedUser;

    /// Alice (1) and Bob (2); Bob owns post 1.
    async fn seeded() -> AppState {
        let state = AppState::in_memory("api-posts-secret").unwrap();
        let auth = state.auth_service();
        auth.register("Alice", "alice", "pw").unwrap();
        auth.register("Bob", "bob", "pw").unwrap();
        create_post(
            State(state.clone()),
            as_user(2),
            Json(CreatePostRequest {
                title: "Hello".to_string(),
                body: "World".to_string(),
            }),
        )
        .await
        .unwrap();
        state
    }

    fn as_user(id: u64) -> Auth {
        Auth(AuthenticatedUser::new(id.to_string()))
    }

    #[tokio::test]
    async fn created_post_is_listed_with_author() {
        let state = seeded().await;
        let Json(posts) = list_posts(State(state)).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Hello");
        assert_eq!(posts[0].author.as_ref().map(|a| a.id), Some(2));
    }

    #[tokio::test]
    async fn non_author_update_is_unauthorized() {
        let state = seeded().await;
        let err = update_post(
            Path(1),
            State(state.clone()),
            as_user(1),
            Json(UpdatePostRequest {
                title: Some("Mine now".to_string()),
                body: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);

        let Json(post) = get_post(Path(1), State(state)).await.unwrap();
        assert_eq!(post.title, "Hello");
    }

    #[tokio::test]
    async fn author_update_returns_fresh_post() {
        let state = seeded().await;
        let Json(post) = update_post(
            Path(1),
            State(state),
            as_user(2),
            Json(UpdatePostRequest {
                title: None,
                body: Some("Edited".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(post.title, "Hello");
        assert_eq!(post.body, "Edited");
        assert_eq!(post.author.map(|a| a.username), Some("bob".to_string()));
    }

    #[tokio::test]
    async fn delete_missing_post_is_not_found() {
        let state = seeded().await;
        let err = delete_post(Path(9), State(state), as_user(2))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn blank_title_is_bad_request() {
        let state = seeded().await;
        let err = create_post(
            State(state),
            as_user(1),
            Json(CreatePostRequest {
                title: " ".to_string(),
                body: "text".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
