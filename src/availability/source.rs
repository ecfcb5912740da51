use std::sync::Arc;
use std::time::Duration;

use anyhow::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::task::JoinSet;

use super::finder::find_slots;
use super::models::{AvailabilityQuery, AvailabilityResponse, BusyInterval, CalendarEventItem};
use crate::clubs::{CalendarConnection, MemberConnection};

/// Source of members' calendar data.
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// Busy periods across all of the member's calendars within
    /// `[time_min, time_max]`.
    async fn fetch_busy_intervals(
        &self,
        connection: &CalendarConnection,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, Error>;

    /// Events on the member's primary calendar, for display only.
    async fn list_events(
        &self,
        connection: &CalendarConnection,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEventItem>, Error>;
}

async fn fetch_member_busy(
    source: Arc<dyn CalendarSource>,
    member: MemberConnection,
    time_min: DateTime<Utc>,
    time_max: DateTime<Utc>,
    timeout: Duration,
) -> Vec<BusyInterval> {
    let fetch = source.fetch_busy_intervals(&member.connection, time_min, time_max);
    match tokio::time::timeout(timeout, fetch).await {
        Ok(Ok(busy)) => busy,
        Ok(Err(e)) => {
            tracing::warn!(
                "Failed to fetch busy intervals for user {} ({}): {}",
                member.user_id,
                member.user_name,
                e
            );
            vec![]
        }
        Err(_) => {
            tracing::warn!(
                "Timed out after {:?} fetching busy intervals for user {} ({})",
                timeout,
                member.user_id,
                member.user_name
            );
            vec![]
        }
    }
}

/// Fetch every member's busy intervals concurrently. The result has
/// one entry per member in the same order as `members`. A member whose
/// fetch fails, times out or panics gets an empty list.
pub async fn collect_busy_intervals(
    source: Arc<dyn CalendarSource>,
    members: &[MemberConnection],
    time_min: DateTime<Utc>,
    time_max: DateTime<Utc>,
    timeout: Duration,
) -> Vec<Vec<BusyInterval>> {
    let mut tasks = JoinSet::new();
    for (idx, member) in members.iter().enumerate() {
        let source = Arc::clone(&source);
        let member = member.clone();
        tasks.spawn(async move {
            let busy = fetch_member_busy(source, member, time_min, time_max, timeout).await;
            (idx, busy)
        });
    }

    let mut busy_by_member = vec![Vec::new(); members.len()];
    while let Some(res) = tasks.join_next().await {
        match res {
            Ok((idx, busy)) => busy_by_member[idx] = busy,
            Err(e) => tracing::error!("Busy interval task failed: {}", e),
        }
    }
    busy_by_member
}

/// Suggest meeting slots for the given connected members.
pub async fn suggest_slots(
    source: Arc<dyn CalendarSource>,
    members: &[MemberConnection],
    query: &AvailabilityQuery,
    timeout: Duration,
) -> AvailabilityResponse {
    if members.is_empty() {
        return AvailabilityResponse::no_connections();
    }

    let busy_by_member =
        collect_busy_intervals(source, members, query.time_min, query.time_max, timeout).await;
    let slots = find_slots(query, &busy_by_member);

    tracing::debug!(
        "Suggested {} slots for {} connected members",
        slots.len(),
        members.len()
    );

    AvailabilityResponse {
        slots,
        total_connected: members.len(),
        message: None,
    }
}
