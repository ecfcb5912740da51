//! Public types for the calendar API
use serde::{Deserialize, Serialize};

use crate::availability::CalendarEventItem;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarQuery {
    pub user_id: String,
}

#[derive(Serialize, Deserialize)]
pub struct CalendarStatusResponse {
    pub connected: bool,
    pub provider: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct DisconnectResponse {
    pub ok: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventsQuery {
    pub user_id: String,
    // Kept as strings so a bad value is reported as an invalid range
    pub time_min: Option<String>,
    pub time_max: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct CalendarEventsResponse {
    pub events: Vec<CalendarEventItem>,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
