use http::StatusCode;
use thiserror::Error;

/// Failures that are reported back to the caller.
#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("Invalid time range: {0}")]
    InvalidRange(String),

    #[error("Club not found: {0}")]
    ClubNotFound(String),

    #[error("Not a member of club: {0}")]
    NotAMember(String),
}

impl AvailabilityError {
    pub fn status(&self) -> StatusCode {
        match self {
            AvailabilityError::InvalidRange(_) => StatusCode::BAD_REQUEST,
            AvailabilityError::ClubNotFound(_) => StatusCode::NOT_FOUND,
            AvailabilityError::NotAMember(_) => StatusCode::FORBIDDEN,
        }
    }
}
