//! Router for the calendar API

use axum::{Router, extract::State, response::Json};
use axum_extra::extract::Query;

use super::public;
use crate::api::public::ApiError;
use crate::api::state::SharedState;
use crate::availability::models::parse_time_range;
use crate::clubs::{delete_calendar_connection, find_calendar_connection};

async fn calendar_status_handler(
    State(state): State<SharedState>,
    Query(params): Query<public::CalendarQuery>,
) -> Result<Json<public::CalendarStatusResponse>, ApiError> {
    let db = state.read().expect("Unable to read share state").db.clone();
    let connection = find_calendar_connection(&db, &params.user_id).await?;

    Ok(Json(public::CalendarStatusResponse {
        connected: connection.is_some(),
        provider: connection.map(|c| c.provider),
    }))
}

async fn calendar_disconnect_handler(
    State(state): State<SharedState>,
    Query(params): Query<public::CalendarQuery>,
) -> Result<Json<public::DisconnectResponse>, ApiError> {
    let db = state.read().expect("Unable to read share state").db.clone();
    let deleted = delete_calendar_connection(&db, &params.user_id).await?;
    tracing::info!(
        "Removed {} calendar connection(s) for user {}",
        deleted,
        params.user_id
    );

    Ok(Json(public::DisconnectResponse { ok: true }))
}

async fn calendar_events_handler(
    State(state): State<SharedState>,
    Query(params): Query<public::CalendarEventsQuery>,
) -> Result<Json<public::CalendarEventsResponse>, ApiError> {
    let (time_min, time_max) =
        parse_time_range(params.time_min.as_deref(), params.time_max.as_deref())?;

    let (db, calendar) = {
        let shared_state = state.read().expect("Unable to read share state");
        (shared_state.db.clone(), shared_state.calendar.clone())
    };

    let Some(connection) = find_calendar_connection(&db, &params.user_id).await? else {
        return Ok(Json(public::CalendarEventsResponse {
            events: vec![],
            connected: false,
            message: Some(String::from(
                "Connect Google Calendar in Profile to see your events here.",
            )),
        }));
    };

    // Events are only shown for comparison so a broken calendar
    // shouldn't fail the request
    let events = calendar
        .list_events(&connection, time_min, time_max)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to list events for user {}: {}", params.user_id, e);
            vec![]
        });

    Ok(Json(public::CalendarEventsResponse {
        events,
        connected: true,
        message: None,
    }))
}

/// Create the calendar router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/",
            axum::routing::get(calendar_status_handler).delete(calendar_disconnect_handler),
        )
        .route("/events", axum::routing::get(calendar_events_handler))
}
