use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct JobApplication {
    pub id: i64,
    pub company: String,
    pub position: String,
    pub status: ApplicationStatus,
    pub progress: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Applied,
    #[sqlx(rename = "oa sent")]
    #[serde(rename = "oa sent")]
    OaSent,
    #[sqlx(rename = "oa received")]
    #[serde(rename = "oa received")]
    OaReceived,
    Interviewed,
    Offered,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 7] = [
        ApplicationStatus::Applied,
        ApplicationStatus::OaSent,
        ApplicationStatus::OaReceived,
        ApplicationStatus::Interviewed,
        ApplicationStatus::Offered,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::OaSent => "oa sent",
            ApplicationStatus::OaReceived => "oa received",
            ApplicationStatus::Interviewed => "interviewed",
            ApplicationStatus::Offered => "offered",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Case-insensitive lookup; surrounding whitespace is not trimmed.
    pub fn parse(raw: &str) -> Option<Self> {
        let lowered = raw.to_lowercase();
        Self::ALL.into_iter().find(|status| status.as_str() == lowered)
    }

    pub fn allowed_values() -> String {
        Self::ALL
            .iter()
            .map(|status| status.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Raw body of a POST or PUT request, before validation.
///
/// `status` and `progress` stay as JSON values so that wrongly typed or
/// "integer-like" input reaches the validator instead of failing to parse.
#[derive(Debug, Deserialize)]
pub struct ApplicationCandidate {
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<serde_json::Value>,
    pub progress: Option<serde_json::Value>,
}

/// Raw body of a PATCH request.
#[derive(Debug, Deserialize)]
pub struct StatusPatchCandidate {
    pub status: Option<serde_json::Value>,
    pub progress: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewApplication {
    #[validate(length(min = 1, max = 100, message = "Company must be between 1 and 100 characters"))]
    pub company: String,
    #[validate(length(min = 1, max = 100, message = "Position must be between 1 and 100 characters"))]
    pub position: String,
    pub status: ApplicationStatus,
    #[validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100"))]
    pub progress: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusPatch {
    pub status: ApplicationStatus,
    pub progress: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationStats {
    pub total_applications: i64,
    pub status_breakdown: std::collections::BTreeMap<String, i64>,
    pub latest_application: Option<JobApplication>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
