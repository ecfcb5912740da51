use std::sync::Arc;

use anyhow::Result;

use crate::availability::{AvailabilityError, AvailabilityQuery, suggest_slots};
use crate::clubs::{find_club, find_member_connections};
use crate::core::{AppConfig, db::async_db, init_tracing};
use crate::google::GoogleCalendar;

pub struct SuggestArgs {
    pub club_id: String,
    pub time_min: String,
    pub time_max: String,
    pub duration_minutes: Option<String>,
    pub start_time_of_day: Option<String>,
    pub end_time_of_day: Option<String>,
    pub offset_minutes: Option<String>,
}

pub async fn run(args: SuggestArgs) -> Result<()> {
    init_tracing();
    let query = AvailabilityQuery::parse(
        Some(&args.time_min),
        Some(&args.time_max),
        args.duration_minutes.as_deref(),
        args.start_time_of_day.as_deref(),
        args.end_time_of_day.as_deref(),
        args.offset_minutes.as_deref(),
    )?;

    let config = AppConfig::from_env()?;
    let db = async_db(&config.db_path).await?;
    if find_club(&db, &args.club_id).await?.is_none() {
        return Err(AvailabilityError::ClubNotFound(args.club_id).into());
    }

    let members = find_member_connections(&db, &args.club_id).await?;
    let calendar = Arc::new(GoogleCalendar::new(&config, db.clone()));
    let resp = suggest_slots(calendar, &members, &query, config.calendar_fetch_timeout).await;

    println!("{}", serde_json::to_string_pretty(&resp)?);
    Ok(())
}
