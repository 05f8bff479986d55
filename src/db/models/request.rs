//! Status workflow shared by connection and mentorship requests.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Request has already been {0}")]
    AlreadyResolved(String),

    #[error("Cannot move a request back to {0}")]
    InvalidTarget(String),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),
}

/// A request status with one initial state and terminal answers.
///
/// Every request starts pending; the addressed alumnus answers it exactly once.
pub trait RequestStatus: Copy + Eq + std::fmt::Display + std::str::FromStr<Err = String> {
    const PENDING: Self;

    fn is_pending(&self) -> bool {
        *self == Self::PENDING
    }

    /// Validate moving from `self` to `target`
    fn transition_to(self, target: Self) -> Result<Self, TransitionError> {
        if !self.is_pending() {
            return Err(TransitionError::AlreadyResolved(self.to_string()));
        }
        if target.is_pending() {
            return Err(TransitionError::InvalidTarget(target.to_string()));
        }
        Ok(target)
    }
}

/// Parse a stored or submitted status string
pub fn parse_status<S: RequestStatus>(value: &str) -> Result<S, TransitionError> {
    value
        .parse::<S>()
        .map_err(|_| TransitionError::UnknownStatus(value.to_string()))
}
