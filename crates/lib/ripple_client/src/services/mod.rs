//! Typed endpoint services, one module per backend surface.

pub mod admin;
pub mod comments;
pub mod likes;
pub mod notifications;
pub mod posts;
pub mod reports;
pub mod users;

use ripple_core::validation::{self, ValidationError};

/// A file selected for upload: name, declared content type, and bytes.
///
/// Validation happens before any bytes go on the wire; ownership of the
/// buffer moves into the multipart form, so an abandoned preview is freed
/// the moment the value drops.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Client-side screening against the accepted types and the size cap.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_upload(&self.name, &self.content_type, self.bytes.len() as u64)
    }
}
