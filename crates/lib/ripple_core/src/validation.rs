//! Client-side validation.
//!
//! These bounds mirror what the backend enforces; checking them before a
//! request saves a round trip (and, for uploads, a wasted transfer).

use thiserror::Error;

/// Post title length bounds.
pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 150;

/// Post content length bounds.
pub const CONTENT_MIN: usize = 10;
pub const CONTENT_MAX: usize = 5000;

/// Comment content cap.
pub const COMMENT_MAX: usize = 1000;

/// Upload limits.
pub const MAX_FILES_PER_POST: usize = 5;
pub const MAX_FILE_BYTES: u64 = 50 * 1024 * 1024;

/// Accepted media content types.
pub const IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/gif"];
pub const VIDEO_TYPES: [&str; 1] = ["video/mp4"];

/// Temporary ban bounds, in days.
pub const BAN_DAYS_MIN: u32 = 1;
pub const BAN_DAYS_MAX: u32 = 365;

/// Report description bounds.
pub const REPORT_DESCRIPTION_MIN: usize = 10;
pub const REPORT_DESCRIPTION_MAX: usize = 1000;

/// Login form bounds.
pub const IDENTIFIER_MIN: usize = 3;
pub const IDENTIFIER_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 6;
pub const PASSWORD_MAX: usize = 100;

/// A client-side validation failure, carrying the violated bound for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("a post can carry at most {MAX_FILES_PER_POST} files")]
    TooManyFiles,

    #[error("file '{name}' exceeds the {MAX_FILE_BYTES} byte limit")]
    FileTooLarge { name: String },

    #[error("file '{name}' has unsupported content type '{content_type}'")]
    UnsupportedFileType { name: String, content_type: String },

    #[error("ban duration must be between {BAN_DAYS_MIN} and {BAN_DAYS_MAX} days")]
    BanDurationOutOfRange,
}

fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ValidationError::Length { field, min, max });
    }
    Ok(())
}

pub fn validate_post_title(title: &str) -> Result<(), ValidationError> {
    check_length("title", title, TITLE_MIN, TITLE_MAX)
}

pub fn validate_post_content(content: &str) -> Result<(), ValidationError> {
    check_length("content", content, CONTENT_MIN, CONTENT_MAX)
}

pub fn validate_comment(content: &str) -> Result<(), ValidationError> {
    check_length("comment", content, 1, COMMENT_MAX)
}

pub fn validate_report_description(description: &str) -> Result<(), ValidationError> {
    check_length(
        "description",
        description,
        REPORT_DESCRIPTION_MIN,
        REPORT_DESCRIPTION_MAX,
    )
}

pub fn validate_identifier(identifier: &str) -> Result<(), ValidationError> {
    check_length("identifier", identifier, IDENTIFIER_MIN, IDENTIFIER_MAX)
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    check_length("password", password, PASSWORD_MIN, PASSWORD_MAX)
}

/// Whether `content_type` is an accepted image or video type.
pub fn is_supported_media_type(content_type: &str) -> bool {
    IMAGE_TYPES.contains(&content_type) || VIDEO_TYPES.contains(&content_type)
}

/// Validate one upload candidate. The file is rejected client-side before any
/// bytes go on the wire.
pub fn validate_upload(name: &str, content_type: &str, size: u64) -> Result<(), ValidationError> {
    if !is_supported_media_type(content_type) {
        return Err(ValidationError::UnsupportedFileType {
            name: name.to_string(),
            content_type: content_type.to_string(),
        });
    }
    if size > MAX_FILE_BYTES {
        return Err(ValidationError::FileTooLarge {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Validate an upload batch size. The sixth file is rejected, the first five
/// are fine.
pub fn validate_upload_count(count: usize) -> Result<(), ValidationError> {
    if count > MAX_FILES_PER_POST {
        return Err(ValidationError::TooManyFiles);
    }
    Ok(())
}

/// Validate a ban duration: `None` means permanent, otherwise 1–365 days.
pub fn validate_ban_duration(duration_days: Option<u32>) -> Result<(), ValidationError> {
    match duration_days {
        None => Ok(()),
        Some(days) if (BAN_DAYS_MIN..=BAN_DAYS_MAX).contains(&days) => Ok(()),
        Some(_) => Err(ValidationError::BanDurationOutOfRange),
    }
}
