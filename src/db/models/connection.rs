//! Connection requests between a student and an alumnus.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::request::{parse_status, RequestStatus, TransitionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus for ConnectionStatus {
    const PENDING: Self = ConnectionStatus::Pending;
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Pending => write!(f, "pending"),
            ConnectionStatus::Accepted => write!(f, "accepted"),
            ConnectionStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for ConnectionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ConnectionStatus::Pending),
            "accepted" => Ok(ConnectionStatus::Accepted),
            "rejected" => Ok(ConnectionStatus::Rejected),
            _ => Err(format!("Unknown connection status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Connection {
    pub id: String,
    pub student_id: String,
    pub alumni_id: String,
    pub status: String,
    pub message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Connection {
    /// Get the status as a ConnectionStatus enum; an unknown stored value is an error
    pub fn status_enum(&self) -> Result<ConnectionStatus, TransitionError> {
        parse_status(&self.status)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateConnectionRequest {
    pub alumni_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateConnectionStatusRequest {
    pub status: ConnectionStatus,
}
