//! Post endpoints: feed, per-user posts, detail, multipart create/edit,
//! delete.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use ripple_core::models::{PageSlice, PagedResponse, Post};
use ripple_core::validation;

use crate::collections::{PageFetcher, PagedCollection};
use crate::error::{ApiError, ApiResult};
use crate::transport::Transport;

use super::UploadFile;

/// Draft for `POST /api/post`.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub files: Vec<UploadFile>,
}

/// Draft for `PUT /api/post/{id}`. `deleted_media_ids` names existing media
/// to drop; new files ride alongside.
#[derive(Debug, Clone)]
pub struct PostEdit {
    pub title: String,
    pub content: String,
    pub files: Vec<UploadFile>,
    pub deleted_media_ids: Vec<i64>,
}

#[derive(Clone)]
pub struct PostService {
    transport: Transport,
}

impl PostService {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// The home feed as a paged collection.
    pub fn feed(&self, page_size: u32) -> PagedCollection<Post> {
        PagedCollection::new(
            page_size,
            Arc::new(FeedFetcher {
                transport: self.transport.clone(),
            }),
        )
    }

    /// One user's posts (profile screen) as a paged collection.
    pub fn user_posts(&self, user_id: i64, page_size: u32) -> PagedCollection<Post> {
        PagedCollection::new(
            page_size,
            Arc::new(UserPostsFetcher {
                transport: self.transport.clone(),
                user_id,
            }),
        )
    }

    pub async fn get(&self, post_id: i64) -> ApiResult<Post> {
        self.transport.get(&format!("/api/post/{post_id}"), &[]).await
    }

    /// Create a post. Title, content, and every file are validated before
    /// upload; the sixth file never leaves the machine.
    pub async fn create(&self, draft: NewPost) -> ApiResult<Post> {
        validation::validate_post_title(&draft.title)?;
        validation::validate_post_content(&draft.content)?;
        validation::validate_upload_count(draft.files.len())?;

        let mut form = Form::new()
            .text("title", draft.title)
            .text("content", draft.content);
        form = attach_files(form, draft.files)?;

        self.transport.post_multipart("/api/post", form).await
    }

    /// Edit a post. `deletedMediaIds` is serialized as a JSON array inside
    /// one multipart text field, as the backend expects.
    pub async fn update(&self, post_id: i64, edit: PostEdit) -> ApiResult<Post> {
        validation::validate_post_title(&edit.title)?;
        validation::validate_post_content(&edit.content)?;
        validation::validate_upload_count(edit.files.len())?;

        let deleted = serde_json::to_string(&edit.deleted_media_ids)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let mut form = Form::new()
            .text("title", edit.title)
            .text("content", edit.content)
            .text("deletedMediaIds", deleted);
        form = attach_files(form, edit.files)?;

        self.transport
            .put_multipart(&format!("/api/post/{post_id}"), form)
            .await
    }

    pub async fn delete(&self, post_id: i64) -> ApiResult<()> {
        self.transport
            .delete_unit(&format!("/api/post/{post_id}"))
            .await
    }
}

fn attach_files(mut form: Form, files: Vec<UploadFile>) -> ApiResult<Form> {
    for file in files {
        file.validate()?;
        let part = Part::bytes(file.bytes)
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| ApiError::Decode(format!("content type '{}': {e}", file.content_type)))?;
        form = form.part("files", part);
    }
    Ok(form)
}

struct FeedFetcher {
    transport: Transport,
}

#[async_trait]
impl PageFetcher<Post> for FeedFetcher {
    async fn fetch(&self, page: u32, size: u32) -> ApiResult<PageSlice<Post>> {
        let response: PagedResponse<Post> = self
            .transport
            .get(
                "/api/post",
                &[("page", page.to_string()), ("size", size.to_string())],
            )
            .await?;
        Ok(response.into())
    }
}

struct UserPostsFetcher {
    transport: Transport,
    user_id: i64,
}

#[async_trait]
impl PageFetcher<Post> for UserPostsFetcher {
    async fn fetch(&self, page: u32, size: u32) -> ApiResult<PageSlice<Post>> {
        let response: PagedResponse<Post> = self
            .transport
            .get(
                &format!("/api/post/user/{}", self.user_id),
                &[("page", page.to_string()), ("size", size.to_string())],
            )
            .await?;
        Ok(response.into())
    }
}
