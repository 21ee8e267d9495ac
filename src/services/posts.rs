// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Posts: public reads, author-only writes.

use std::{collections::HashMap, sync::Arc};

use super::{non_blank, require, ServiceError, ServiceResult};
use crate::{
    models::{NewPost, Post, PostResponse, UpdatePostRequest, User},
    storage::{OwnershipCheck, PostStore, UserStore},
};

/// A post with its author loaded, if the author still exists.
#[derive(Debug, Clone)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: Option<User>,
}

impl From<PostWithAuthor> for PostResponse {
    fn from(value: PostWithAuthor) -> Self {
        PostResponse::new(value.post, value.author)
    }
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostStore>,
    users: Arc<dyn UserStore>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostStore>, users: Arc<dyn UserStore>) -> Self {
        Self { posts, users }
    }

    pub fn get_post(&self, id: u64) -> ServiceResult<PostWithAuthor> {
        let post = self
            .posts
            .get_post(id)?
            .ok_or(ServiceError::NotFound("Post"))?;
        let author = self.users.get_user(post.owner_id)?;
        Ok(PostWithAuthor { post, author })
    }

    /// All live posts in id order, each with its author.
    pub fn list_posts(&self) -> ServiceResult<Vec<PostWithAuthor>> {
        let mut authors: HashMap<u64, Option<User>> = HashMap::new();
        let mut result = Vec::new();
        for post in self.posts.list_posts()? {
            let author = match authors.get(&post.owner_id) {
                Some(author) => author.clone(),
                None => {
                    let author = self.users.get_user(post.owner_id)?;
                    authors.insert(post.owner_id, author.clone());
                    author
                }
            };
            result.push(PostWithAuthor { post, author });
        }
        Ok(result)
    }

    /// Publish a post owned by the caller.
    ///
    /// # Errors
    /// `InvalidInput` for a blank title or body, `NotFound` if the caller's
    /// account no longer exists.
    pub fn create_post(&self, caller: u64, title: &str, body: &str) -> ServiceResult<PostWithAuthor> {
        require("title", title)?;
        require("body", body)?;

        let author = self
            .users
            .get_user(caller)?
            .ok_or(ServiceError::NotFound("User"))?;
        let post = self.posts.create_post(NewPost {
            title: title.to_string(),
            body: body.to_string(),
            owner_id: author.id,
        })?;

        tracing::info!(post_id = post.id, user_id = caller, "Post created");
        Ok(PostWithAuthor {
            post,
            author: Some(author),
        })
    }

    /// Edit a post. Only its author may do so.
    ///
    /// # Errors
    /// `NotFound` if the post does not exist, `MismatchedAuthor` if the
    /// caller is not its owner.
    pub fn update_post(
        &self,
        caller: u64,
        id: u64,
        changes: UpdatePostRequest,
    ) -> ServiceResult<Post> {
        let mut post = self.posts.get_post(id)?.verify_owner(caller)?;

        if let Some(title) = non_blank(changes.title) {
            post.title = title;
        }
        if let Some(body) = non_blank(changes.body) {
            post.body = body;
        }

        let updated = self.posts.update_post(&post)?;
        tracing::info!(post_id = id, user_id = caller, "Post updated");
        Ok(updated)
    }

    /// Soft-delete a post. Only its author may do so.
    pub fn delete_post(&self, caller: u64, id: u64) -> ServiceResult<()> {
        self.posts.get_post(id)?.verify_owner(caller)?;
        self.posts.delete_post(id)?;
        tracing::info!(post_id = id, user_id = caller, "Post deleted");
        Ok(())
    }
}
