//! Google Calendar API client for free/busy lookups and event listing
use std::collections::HashMap;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::Connection;

use super::oauth::refresh_access_token;
use crate::availability::{BusyInterval, CalendarEventItem, CalendarSource};
use crate::clubs::{CalendarConnection, upsert_calendar_connection};
use crate::core::AppConfig;

// Google rejects free/busy queries with more calendars than this
const FREEBUSY_MAX_CALENDARS: usize = 50;
const MAX_EVENTS: &str = "100";

#[derive(Debug, Deserialize)]
pub struct CalendarListEntry {
    pub id: String,
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarListResponse {
    #[serde(default)]
    pub items: Vec<CalendarListEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FreeBusyRequest<'a> {
    time_min: String,
    time_max: String,
    items: Vec<FreeBusyItem<'a>>,
}

#[derive(Debug, Serialize)]
struct FreeBusyItem<'a> {
    id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct FreeBusyCalendar {
    #[serde(default)]
    pub busy: Vec<BusyInterval>,
}

#[derive(Debug, Deserialize)]
pub struct FreeBusyResponse {
    #[serde(default)]
    pub calendars: HashMap<String, FreeBusyCalendar>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: Option<String>,
    // Set instead of `date_time` for all-day events
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Event {
    pub id: Option<String>,
    pub summary: Option<String>,
    pub start: Option<EventDateTime>,
    pub end: Option<EventDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct ListEventsResponse {
    #[serde(default)]
    pub items: Vec<Event>,
}

/// Calendar ids the user can see, `primary` first, capped at the
/// free/busy limit. Falls back to just `primary` if the list can't be
/// fetched.
pub async fn list_calendar_ids(client: &Client, api_url: &str, access_token: &str) -> Vec<String> {
    let url = format!("{}/calendar/v3/users/me/calendarList", api_url);
    let resp = async {
        client
            .get(&url)
            .query(&[("maxResults", "250")])
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json::<CalendarListResponse>()
            .await
    }
    .await;

    let entries = match resp {
        Ok(list) => list.items,
        Err(e) => {
            tracing::warn!("Failed to list calendars, using primary only: {}", e);
            return vec![String::from("primary")];
        }
    };

    let mut ids = vec![String::from("primary")];
    for entry in entries {
        if ids.len() >= FREEBUSY_MAX_CALENDARS {
            break;
        }
        if !ids.contains(&entry.id) {
            ids.push(entry.id);
        }
    }
    ids
}

/// Busy periods of every calendar in `calendar_ids`, merged into one
/// list.
pub async fn query_freebusy(
    client: &Client,
    api_url: &str,
    access_token: &str,
    calendar_ids: &[String],
    time_min: DateTime<Utc>,
    time_max: DateTime<Utc>,
) -> Result<Vec<BusyInterval>, Error> {
    let body = FreeBusyRequest {
        time_min: time_min.to_rfc3339(),
        time_max: time_max.to_rfc3339(),
        items: calendar_ids
            .iter()
            .map(|id| FreeBusyItem { id: id.as_str() })
            .collect(),
    };
    let resp = client
        .post(format!("{}/calendar/v3/freeBusy", api_url))
        .bearer_auth(access_token)
        .json(&body)
        .send()
        .await?
        .error_for_status()?
        .json::<FreeBusyResponse>()
        .await?;

    let busy = resp
        .calendars
        .into_values()
        .flat_map(|cal| cal.busy)
        .collect();
    Ok(busy)
}

/// Single events on `calendar_id` in `[time_min, time_max]`, ordered
/// by start time.
pub async fn list_events(
    client: &Client,
    api_url: &str,
    access_token: &str,
    calendar_id: &str,
    time_min: DateTime<Utc>,
    time_max: DateTime<Utc>,
) -> Result<Vec<CalendarEventItem>, Error> {
    let url = format!(
        "{}/calendar/v3/calendars/{}/events",
        api_url,
        urlencoding::encode(calendar_id)
    );
    let time_min = time_min.to_rfc3339();
    let time_max = time_max.to_rfc3339();
    let resp = client
        .get(&url)
        .query(&[
            ("timeMin", time_min.as_str()),
            ("timeMax", time_max.as_str()),
            ("singleEvents", "true"),
            ("orderBy", "startTime"),
            ("maxResults", MAX_EVENTS),
        ])
        .bearer_auth(access_token)
        .send()
        .await?
        .error_for_status()?
        .json::<ListEventsResponse>()
        .await?;

    let events = resp
        .items
        .into_iter()
        .filter_map(|event| {
            let start = event.start.and_then(|s| s.date_time.or(s.date))?;
            let end = event.end.and_then(|e| e.date_time.or(e.date))?;
            Some(CalendarEventItem {
                summary: event.summary.unwrap_or_else(|| "(No title)".to_string()),
                start,
                end,
            })
        })
        .collect();
    Ok(events)
}

/// `CalendarSource` backed by the Google Calendar API. Refreshed
/// access tokens are written back to `db`.
pub struct GoogleCalendar {
    client: Client,
    db: Connection,
    api_url: String,
    oauth_url: String,
    client_id: String,
    client_secret: String,
}

impl GoogleCalendar {
    pub fn new(config: &AppConfig, db: Connection) -> Self {
        Self {
            client: Client::new(),
            db,
            api_url: config.google_api_url.clone(),
            oauth_url: config.google_oauth_url.clone(),
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
        }
    }

    /// Use the stored access token while it is valid, otherwise
    /// refresh it and store the new one.
    async fn access_token(&self, connection: &CalendarConnection) -> Result<String, Error> {
        if connection.expires_at > Utc::now() {
            return Ok(connection.access_token.clone());
        }
        let refresh_token = connection.refresh_token.as_deref().ok_or(anyhow!(
            "Access token for user {} expired and no refresh token is stored",
            connection.user_id
        ))?;
        let token = refresh_access_token(
            &self.oauth_url,
            &self.client_id,
            &self.client_secret,
            refresh_token,
        )
        .await?;
        let expires_in = token
            .expires_in
            .unwrap_or(Duration::hours(1).num_seconds());
        tracing::debug!(
            "Refreshed access token for user {}, valid for {}s",
            connection.user_id,
            expires_in
        );

        // The fresh token is still usable for this request if saving fails
        if let Err(e) = upsert_calendar_connection(
            &self.db,
            &connection.user_id,
            &token.access_token,
            token.refresh_token.as_deref(),
            Utc::now() + Duration::seconds(expires_in),
        )
        .await
        {
            tracing::warn!(
                "Failed to store refreshed token for user {}: {}",
                connection.user_id,
                e
            );
        }
        Ok(token.access_token)
    }
}

#[async_trait]
impl CalendarSource for GoogleCalendar {
    async fn fetch_busy_intervals(
        &self,
        connection: &CalendarConnection,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, Error> {
        let token = self.access_token(connection).await?;
        let calendar_ids = list_calendar_ids(&self.client, &self.api_url, &token).await;
        query_freebusy(
            &self.client,
            &self.api_url,
            &token,
            &calendar_ids,
            time_min,
            time_max,
        )
        .await
    }

    async fn list_events(
        &self,
        connection: &CalendarConnection,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEventItem>, Error> {
        let token = self.access_token(connection).await?;
        list_events(
            &self.client,
            &self.api_url,
            &token,
            "primary",
            time_min,
            time_max,
        )
        .await
    }
}
