//! Comment endpoints. The thread is a paged collection keyed on the host
//! post; create/edit/delete return the canonical record for the caller to
//! fold back in with the collection's mutation hooks.

use std::sync::Arc;

use async_trait::async_trait;

use ripple_core::models::{Comment, CommentPage, CreateCommentRequest, PageSlice};
use ripple_core::validation;

use crate::collections::{PageFetcher, PagedCollection};
use crate::error::ApiResult;
use crate::transport::Transport;

#[derive(Clone)]
pub struct CommentService {
    transport: Transport,
}

impl CommentService {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// The comment thread under a post.
    pub fn thread(&self, post_id: i64, page_size: u32) -> PagedCollection<Comment> {
        PagedCollection::new(
            page_size,
            Arc::new(ThreadFetcher {
                transport: self.transport.clone(),
                post_id,
            }),
        )
    }

    pub async fn create(&self, post_id: i64, content: &str) -> ApiResult<Comment> {
        validation::validate_comment(content)?;
        self.transport
            .post(
                &format!("/api/posts/{post_id}/comments"),
                &CreateCommentRequest {
                    content: content.to_string(),
                },
            )
            .await
    }

    pub async fn update(&self, comment_id: i64, content: &str) -> ApiResult<Comment> {
        validation::validate_comment(content)?;
        self.transport
            .put(
                &format!("/api/comments/{comment_id}"),
                &CreateCommentRequest {
                    content: content.to_string(),
                },
            )
            .await
    }

    pub async fn delete(&self, comment_id: i64) -> ApiResult<()> {
        self.transport
            .delete_unit(&format!("/api/comments/{comment_id}"))
            .await
    }
}

struct ThreadFetcher {
    transport: Transport,
    post_id: i64,
}

#[async_trait]
impl PageFetcher<Comment> for ThreadFetcher {
    async fn fetch(&self, page: u32, size: u32) -> ApiResult<PageSlice<Comment>> {
        let response: CommentPage = self
            .transport
            .get(
                &format!("/api/posts/{}/comments", self.post_id),
                &[("page", page.to_string()), ("size", size.to_string())],
            )
            .await?;
        Ok(response.into())
    }
}
