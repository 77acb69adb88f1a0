//! User-to-user reporting models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::paging::Identified;

/// Why an entity is being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportReason {
    Spam,
    Harassment,
    HateSpeech,
    InappropriateContent,
    Violence,
    Misinformation,
    Impersonation,
    CopyrightViolation,
    Other,
}

impl ReportReason {
    /// Human-readable label for pickers and report listings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Spam => "Spam or misleading content",
            Self::Harassment => "Harassment or bullying",
            Self::HateSpeech => "Hate speech or discrimination",
            Self::InappropriateContent => "Inappropriate or offensive content",
            Self::Violence => "Violence or threats",
            Self::Misinformation => "Misinformation",
            Self::Impersonation => "Impersonation",
            Self::CopyrightViolation => "Copyright violation",
            Self::Other => "Other",
        }
    }
}

/// Report lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Pending,
    Resolved,
    Dismissed,
}

/// What kind of entity a report targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportedType {
    User,
    Post,
}

/// Body for `POST /api/reports`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub reported_type: ReportedType,
    pub reported_entity_id: i64,
    pub reason: ReportReason,
    pub description: String,
}

/// A submitted report, as echoed back to the reporter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: i64,
    pub reported_type: ReportedType,
    pub reported_entity_id: i64,
    pub reason: ReportReason,
    pub description: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

impl Identified for ReportResponse {
    fn id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_serializes_screaming_snake() {
        let v = serde_json::to_value(ReportReason::HateSpeech).expect("serialize");
        assert_eq!(v, "HATE_SPEECH");
        assert_eq!(ReportReason::HateSpeech.label(), "Hate speech or discrimination");
    }

    #[test]
    fn status_set_is_three_valued() {
        for (s, expected) in [
            (ReportStatus::Pending, "PENDING"),
            (ReportStatus::Resolved, "RESOLVED"),
            (ReportStatus::Dismissed, "DISMISSED"),
        ] {
            assert_eq!(serde_json::to_value(s).expect("serialize"), expected);
        }
    }
}
