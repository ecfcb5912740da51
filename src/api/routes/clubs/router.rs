//! Router for the clubs API

use axum::{
    Router,
    extract::{Path, State},
    response::Json,
};
use axum_extra::extract::Query;

use super::public;
use crate::api::public::ApiError;
use crate::api::state::SharedState;
use crate::availability::{AvailabilityError, AvailabilityQuery, suggest_slots};
use crate::clubs::{find_club, find_member_connections, is_member};

/// Suggest meeting times for a club based on members' free/busy
/// calendars
async fn availability_handler(
    State(state): State<SharedState>,
    Path(club_id): Path<String>,
    Query(params): Query<public::AvailabilityParams>,
) -> Result<Json<public::AvailabilityResponse>, ApiError> {
    // Validate before touching the db or any calendars
    let query = AvailabilityQuery::parse(
        params.time_min.as_deref(),
        params.time_max.as_deref(),
        params.duration_minutes.as_deref(),
        params.start_time_of_day.as_deref(),
        params.end_time_of_day.as_deref(),
        params.offset_minutes.as_deref(),
    )?;

    let (db, calendar, timeout) = {
        let shared_state = state.read().expect("Unable to read share state");
        (
            shared_state.db.clone(),
            shared_state.calendar.clone(),
            shared_state.config.calendar_fetch_timeout,
        )
    };

    if find_club(&db, &club_id).await?.is_none() {
        return Err(AvailabilityError::ClubNotFound(club_id).into());
    }

    let allowed = match params.user_id.as_deref() {
        Some(user_id) => is_member(&db, &club_id, user_id).await?,
        None => false,
    };
    if !allowed {
        return Err(AvailabilityError::NotAMember(club_id).into());
    }

    let members = find_member_connections(&db, &club_id).await?;
    tracing::debug!(
        "Finding availability for club {} with {} connected members",
        club_id,
        members.len()
    );

    let resp = suggest_slots(calendar, &members, &query, timeout).await;
    Ok(Json(resp))
}

/// Create the clubs router
pub fn router() -> Router<SharedState> {
    Router::new().route(
        "/{id}/availability",
        axum::routing::get(availability_handler),
    )
}
