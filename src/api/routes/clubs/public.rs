//! Public types for the clubs API
use serde::Deserialize;

pub use crate::availability::{AvailabilityResponse, CandidateSlot};

/// Query string for availability suggestions. Everything but the
/// time range is parsed leniently so values stay as strings here.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityParams {
    /// Requesting user. Must be a member of the club.
    pub user_id: Option<String>,
    pub time_min: Option<String>,
    pub time_max: Option<String>,
    pub duration_minutes: Option<String>,
    pub start_time_of_day: Option<String>,
    pub end_time_of_day: Option<String>,
    pub offset_minutes: Option<String>,
}
