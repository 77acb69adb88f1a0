//! Server paging shapes.
//!
//! The backend pages three different ways: the post endpoints return
//! `PagedResponse`, the comment thread returns `CommentPage`, and the admin
//! tables (plus my-reports) return a Spring-style page object. All three
//! normalize into [`PageSlice`], the only shape the paged window consumes.

use serde::{Deserialize, Serialize};

use super::comment::Comment;

/// Normalized slice of a server-paged collection.
#[derive(Debug, Clone)]
pub struct PageSlice<T> {
    pub content: Vec<T>,
    pub current_page: u32,
    pub total_elements: u64,
    pub has_more: bool,
}

/// Page shape of `/api/post` and `/api/post/user/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub content: Vec<T>,
    pub current_page: u32,
    pub total_elements: u64,
    pub has_more: bool,
}

impl<T> From<PagedResponse<T>> for PageSlice<T> {
    fn from(page: PagedResponse<T>) -> Self {
        Self {
            content: page.content,
            current_page: page.current_page,
            total_elements: page.total_elements,
            has_more: page.has_more,
        }
    }
}

/// Page shape of `/api/posts/{id}/comments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPage {
    pub comments: Vec<Comment>,
    pub total_comments: u64,
    pub current_page: u32,
    pub total_pages: u32,
    pub has_more: bool,
}

impl From<CommentPage> for PageSlice<Comment> {
    fn from(page: CommentPage) -> Self {
        Self {
            content: page.comments,
            current_page: page.current_page,
            total_elements: page.total_comments,
            has_more: page.has_more,
        }
    }
}

/// Spring-style page object returned by the admin tables and my-reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpringPage<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub size: u32,
    pub number: u32,
    pub first: bool,
    pub last: bool,
}

impl<T> From<SpringPage<T>> for PageSlice<T> {
    fn from(page: SpringPage<T>) -> Self {
        Self {
            content: page.content,
            current_page: page.number,
            total_elements: page.total_elements,
            has_more: !page.last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spring_page_has_more_is_not_last() {
        let json = r#"{
            "content": [1, 2, 3],
            "totalElements": 9,
            "totalPages": 3,
            "size": 3,
            "number": 1,
            "first": false,
            "last": false
        }"#;
        let page: SpringPage<i64> = serde_json::from_str(json).expect("parse page");
        let slice: PageSlice<i64> = page.into();
        assert!(slice.has_more);
        assert_eq!(slice.current_page, 1);
        assert_eq!(slice.total_elements, 9);
    }

    #[test]
    fn comment_page_normalizes_totals() {
        let json = r#"{
            "comments": [],
            "totalComments": 0,
            "currentPage": 0,
            "totalPages": 0,
            "hasMore": false
        }"#;
        let page: CommentPage = serde_json::from_str(json).expect("parse page");
        let slice: PageSlice<Comment> = page.into();
        assert_eq!(slice.total_elements, 0);
        assert!(!slice.has_more);
    }
}
