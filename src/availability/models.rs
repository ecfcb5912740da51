use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::error::AvailabilityError;
use super::window::TimeOfDayWindow;

pub const DEFAULT_DURATION_MINUTES: i64 = 120;
pub const MIN_DURATION_MINUTES: i64 = 30;
pub const MAX_DURATION_MINUTES: i64 = 240;
pub const SLOT_STEP_MINUTES: i64 = 60;
pub const MAX_SLOTS: usize = 20;

/// A period during which one member is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub free_count: usize,
    pub total_connected: usize,
}

/// An event from a member's own calendar, shown next to suggested
/// slots. All-day events carry a plain date in `start` and `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEventItem {
    pub summary: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub slots: Vec<CandidateSlot>,
    pub total_connected: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AvailabilityResponse {
    pub fn no_connections() -> Self {
        Self {
            slots: vec![],
            total_connected: 0,
            message: Some(String::from(
                "No club members have connected Google Calendar. Connect in Profile to see suggestions.",
            )),
        }
    }
}

/// Default to 120 minutes and keep the result within `[30, 240]`.
pub fn clamp_duration(duration_minutes: Option<i64>) -> i64 {
    duration_minutes
        .unwrap_or(DEFAULT_DURATION_MINUTES)
        .clamp(MIN_DURATION_MINUTES, MAX_DURATION_MINUTES)
}

/// Parse both bounds of a search window, rejecting missing,
/// unparsable or inverted values.
pub fn parse_time_range(
    time_min: Option<&str>,
    time_max: Option<&str>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), AvailabilityError> {
    let (Some(time_min), Some(time_max)) = (time_min, time_max) else {
        return Err(AvailabilityError::InvalidRange(String::from(
            "timeMin and timeMax (ISO) required",
        )));
    };
    let parse = |s: &str| {
        DateTime::parse_from_rfc3339(s.trim())
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| AvailabilityError::InvalidRange(format!("{}: {}", s, e)))
    };
    let min = parse(time_min)?;
    let max = parse(time_max)?;
    if max <= min {
        return Err(AvailabilityError::InvalidRange(String::from(
            "timeMax must be after timeMin",
        )));
    }
    Ok((min, max))
}

/// Validated inputs for a slot search.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityQuery {
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
    pub duration_minutes: i64,
    pub window: Option<TimeOfDayWindow>,
}

impl AvailabilityQuery {
    /// Build a query from raw request values. Only the time range can
    /// fail; a bad duration falls back to the default and a bad
    /// time-of-day window is dropped.
    pub fn parse(
        time_min: Option<&str>,
        time_max: Option<&str>,
        duration_minutes: Option<&str>,
        start_time_of_day: Option<&str>,
        end_time_of_day: Option<&str>,
        offset_minutes: Option<&str>,
    ) -> Result<Self, AvailabilityError> {
        let (time_min, time_max) = parse_time_range(time_min, time_max)?;
        let duration_minutes =
            clamp_duration(duration_minutes.and_then(|s| s.trim().parse::<i64>().ok()));
        let offset_minutes = offset_minutes.and_then(|s| s.trim().parse::<i64>().ok());
        let window = TimeOfDayWindow::parse(start_time_of_day, end_time_of_day, offset_minutes);

        Ok(Self {
            time_min,
            time_max,
            duration_minutes,
            window,
        })
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(self.duration_minutes)
    }
}
