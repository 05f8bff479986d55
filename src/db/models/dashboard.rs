//! Dashboard view models.

use serde::{Deserialize, Serialize};

use super::common::AppRole;
use super::connection::{Connection, ConnectionStatus};
use super::mentorship::{MentorshipRequest, MentorshipRequestRow, MentorshipStatus};

/// Public identity of the other party of a request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileSummary {
    pub user_id: String,
    pub full_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionWithProfile {
    #[serde(flatten)]
    pub connection: Connection,
    pub other_profile: Option<ProfileSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorshipWithProfile {
    #[serde(flatten)]
    pub request: MentorshipRequest,
    pub other_profile: Option<ProfileSummary>,
}

/// Other party's identity columns from a `LEFT JOIN profiles p`.
///
/// Select them with `p.user_id AS other_user_id, p.full_name AS other_full_name,
/// p.email AS other_email, p.avatar_url AS other_avatar_url`.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct OtherPartyColumns {
    pub other_user_id: Option<String>,
    pub other_full_name: Option<String>,
    pub other_email: Option<String>,
    pub other_avatar_url: Option<String>,
}

impl OtherPartyColumns {
    /// `None` when the join found no profile
    pub fn into_summary(self) -> Option<ProfileSummary> {
        Some(ProfileSummary {
            user_id: self.other_user_id?,
            full_name: self.other_full_name?,
            email: self.other_email?,
            avatar_url: self.other_avatar_url,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConnectionJoinRow {
    #[sqlx(flatten)]
    pub connection: Connection,
    #[sqlx(flatten)]
    pub other: OtherPartyColumns,
}

impl From<ConnectionJoinRow> for ConnectionWithProfile {
    fn from(row: ConnectionJoinRow) -> Self {
        Self {
            connection: row.connection,
            other_profile: row.other.into_summary(),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MentorshipJoinRow {
    #[sqlx(flatten)]
    pub request: MentorshipRequestRow,
    #[sqlx(flatten)]
    pub other: OtherPartyColumns,
}

impl From<MentorshipJoinRow> for MentorshipWithProfile {
    fn from(row: MentorshipJoinRow) -> Self {
        Self {
            request: MentorshipRequest::from(row.request),
            other_profile: row.other.into_summary(),
        }
    }
}

/// Status counts shown on the dashboard
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestStats {
    pub pending_connections: usize,
    pub accepted_connections: usize,
    pub pending_mentorships: usize,
    pub approved_mentorships: usize,
}

impl RequestStats {
    pub fn from_statuses(
        connections: impl IntoIterator<Item = ConnectionStatus>,
        mentorships: impl IntoIterator<Item = MentorshipStatus>,
    ) -> Self {
        let mut stats = Self::default();
        for status in connections {
            match status {
                ConnectionStatus::Pending => stats.pending_connections += 1,
                ConnectionStatus::Accepted => stats.accepted_connections += 1,
                ConnectionStatus::Rejected => {}
            }
        }
        for status in mentorships {
            match status {
                MentorshipStatus::Pending => stats.pending_mentorships += 1,
                MentorshipStatus::Approved => stats.approved_mentorships += 1,
                MentorshipStatus::Rejected => {}
            }
        }
        stats
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub role: AppRole,
    pub full_name: String,
    pub profile_complete: bool,
    pub stats: RequestStats,
    pub recent_connections: Vec<ConnectionWithProfile>,
    pub recent_mentorship_requests: Vec<MentorshipWithProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_count_each_status() {
        let stats = RequestStats::from_statuses(
            [
                ConnectionStatus::Pending,
                ConnectionStatus::Accepted,
                ConnectionStatus::Accepted,
                ConnectionStatus::Rejected,
            ],
            [MentorshipStatus::Approved, MentorshipStatus::Rejected],
        );

        assert_eq!(
            stats,
            RequestStats {
                pending_connections: 1,
                accepted_connections: 2,
                pending_mentorships: 0,
                approved_mentorships: 1,
            }
        );
    }

    #[test]
    fn test_stats_empty() {
        let stats = RequestStats::from_statuses([], []);
        assert_eq!(stats, RequestStats::default());
    }

    #[test]
    fn test_missing_join_gives_no_summary() {
        assert_eq!(OtherPartyColumns::default().into_summary(), None);

        let other = OtherPartyColumns {
            other_user_id: Some("u1".to_string()),
            other_full_name: Some("Priya".to_string()),
            other_email: Some("priya@example.edu".to_string()),
            other_avatar_url: None,
        };
        let summary = other.into_summary().unwrap();
        assert_eq!(summary.full_name, "Priya");
        assert_eq!(summary.avatar_url, None);
    }
}
