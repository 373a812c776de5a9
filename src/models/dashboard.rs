// src/models/dashboard.rs
use crate::models::scholarship::ScholarshipRecord;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estado de uma candidatura acompanhada no painel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Saved,
    Applied,
    #[serde(rename = "Under Review")]
    UnderReview,
    #[serde(rename = "Documents Submitted")]
    DocumentsSubmitted,
    #[serde(rename = "Interview Scheduled")]
    InterviewScheduled,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Saved => "Saved",
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::UnderReview => "Under Review",
            ApplicationStatus::DocumentsSubmitted => "Documents Submitted",
            ApplicationStatus::InterviewScheduled => "Interview Scheduled",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "Saved" => Some(ApplicationStatus::Saved),
            "Applied" => Some(ApplicationStatus::Applied),
            "Under Review" => Some(ApplicationStatus::UnderReview),
            "Documents Submitted" => Some(ApplicationStatus::DocumentsSubmitted),
            "Interview Scheduled" => Some(ApplicationStatus::InterviewScheduled),
            _ => None,
        }
    }
}

// --- Linhas lidas da DB ---

#[derive(Debug, FromRow)]
pub struct SavedRow {
    pub scholarship_id: i64,
    pub saved_at: String,
}

#[derive(Debug, FromRow)]
pub struct ApplicationRow {
    pub scholarship_id: i64,
    pub status: String,
    pub updated_at: String,
}

// --- Estruturas devolvidas ao cliente ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedScholarship {
    pub scholarship: ScholarshipRecord,
    pub saved_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationEntry {
    pub scholarship: ScholarshipRecord,
    pub status: ApplicationStatus,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub saved: Vec<SavedScholarship>,
    pub applications: Vec<ApplicationEntry>,
}

/// Corpo do PUT /api/dashboard/applications/{id}
#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub status: ApplicationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_names_round_trip_through_db_text() {
        for status in [
            ApplicationStatus::Saved,
            ApplicationStatus::Applied,
            ApplicationStatus::UnderReview,
            ApplicationStatus::DocumentsSubmitted,
            ApplicationStatus::InterviewScheduled,
        ] {
            assert_eq!(ApplicationStatus::from_db(status.as_str()), Some(status));
        }
        assert_eq!(ApplicationStatus::from_db("under review"), None);
    }

    #[test]
    fn status_payload_accepts_display_names() {
        let payload: StatusPayload = serde_json::from_str(r#"{"status":"Under Review"}"#).unwrap();
        assert_eq!(payload.status, ApplicationStatus::UnderReview);
    }
}
