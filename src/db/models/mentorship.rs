//! Mentorship requests from students to alumni who mentor.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::common::parse_string_set;
use super::request::{parse_status, RequestStatus, TransitionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentorshipStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus for MentorshipStatus {
    const PENDING: Self = MentorshipStatus::Pending;
}

impl std::fmt::Display for MentorshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MentorshipStatus::Pending => write!(f, "pending"),
            MentorshipStatus::Approved => write!(f, "approved"),
            MentorshipStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for MentorshipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(MentorshipStatus::Pending),
            "approved" => Ok(MentorshipStatus::Approved),
            "rejected" => Ok(MentorshipStatus::Rejected),
            _ => Err(format!("Unknown mentorship status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct MentorshipRequestRow {
    pub id: String,
    pub student_id: String,
    pub alumni_id: String,
    pub status: String,
    pub message: Option<String>,
    pub areas_of_interest: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorshipRequest {
    pub id: String,
    pub student_id: String,
    pub alumni_id: String,
    pub status: String,
    pub message: Option<String>,
    pub areas_of_interest: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl MentorshipRequest {
    /// Get the status as a MentorshipStatus enum; an unknown stored value is an error
    pub fn status_enum(&self) -> Result<MentorshipStatus, TransitionError> {
        parse_status(&self.status)
    }
}

impl From<MentorshipRequestRow> for MentorshipRequest {
    fn from(row: MentorshipRequestRow) -> Self {
        Self {
            id: row.id,
            student_id: row.student_id,
            alumni_id: row.alumni_id,
            status: row.status,
            message: row.message,
            areas_of_interest: parse_string_set(&row.areas_of_interest),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateMentorshipRequest {
    pub alumni_id: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub areas_of_interest: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMentorshipStatusRequest {
    pub status: MentorshipStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::request::{parse_status, TransitionError};

    #[test]
    fn test_pending_can_be_approved_or_rejected() {
        assert!(MentorshipStatus::Pending
            .transition_to(MentorshipStatus::Approved)
            .is_ok());
        assert!(MentorshipStatus::Pending
            .transition_to(MentorshipStatus::Rejected)
            .is_ok());
    }

    #[test]
    fn test_approved_is_final() {
        assert!(MentorshipStatus::Approved
            .transition_to(MentorshipStatus::Rejected)
            .is_err());
    }

    #[test]
    fn test_parse_status_reports_unknown_values() {
        assert_eq!(
            parse_status::<MentorshipStatus>("accepted"),
            Err(TransitionError::UnknownStatus("accepted".to_string()))
        );
        assert_eq!(
            parse_status::<MentorshipStatus>("approved"),
            Ok(MentorshipStatus::Approved)
        );
    }

    #[test]
    fn test_row_conversion_parses_areas() {
        let row = MentorshipRequestRow {
            id: "m1".to_string(),
            student_id: "s1".to_string(),
            alumni_id: "a1".to_string(),
            status: "pending".to_string(),
            message: None,
            areas_of_interest: r#"["career","systems"]"#.to_string(),
            created_at: "2026-01-01T00:00:00.000000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000000Z".to_string(),
        };
        let req = MentorshipRequest::from(row);
        assert_eq!(req.areas_of_interest, vec!["career", "systems"]);
        assert_eq!(req.status_enum(), Ok(MentorshipStatus::Pending));
    }
}
