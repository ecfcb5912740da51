//! Test utilities for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use axum::{Router, body::Body};
use chrono::{DateTime, Utc};
use tempfile::TempDir;
use tokio_rusqlite::Connection;

use whiskey_night::api::AppState;
use whiskey_night::api::app;
use whiskey_night::availability::{BusyInterval, CalendarEventItem, CalendarSource};
use whiskey_night::clubs::{
    CalendarConnection, Club, User, add_member, create_club, upsert_calendar_connection,
};
use whiskey_night::core::AppConfig;
use whiskey_night::core::db::{async_db, initialize_db};

/// Canned calendar responses for one user
#[derive(Clone)]
pub enum FakeResponse {
    Busy(Vec<BusyInterval>),
    Events(Vec<CalendarEventItem>),
    Fail,
}

/// Calendar source answering from canned data keyed by user id.
/// Unknown users have no busy time and no events.
#[derive(Default)]
pub struct FakeCalendar {
    pub by_user: HashMap<String, FakeResponse>,
}

impl FakeCalendar {
    pub fn with(mut self, user_id: &str, response: FakeResponse) -> Self {
        self.by_user.insert(user_id.to_string(), response);
        self
    }
}

#[async_trait]
impl CalendarSource for FakeCalendar {
    async fn fetch_busy_intervals(
        &self,
        connection: &CalendarConnection,
        _time_min: DateTime<Utc>,
        _time_max: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, Error> {
        match self.by_user.get(&connection.user_id) {
            Some(FakeResponse::Busy(busy)) => Ok(busy.clone()),
            Some(FakeResponse::Fail) => Err(anyhow!("calendar unavailable")),
            _ => Ok(vec![]),
        }
    }

    async fn list_events(
        &self,
        connection: &CalendarConnection,
        _time_min: DateTime<Utc>,
        _time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEventItem>, Error> {
        match self.by_user.get(&connection.user_id) {
            Some(FakeResponse::Events(events)) => Ok(events.clone()),
            Some(FakeResponse::Fail) => Err(anyhow!("calendar unavailable")),
            _ => Ok(vec![]),
        }
    }
}

/// A router over a fresh database in a temporary directory. The
/// directory is removed when this is dropped.
pub struct TestApp {
    pub router: Router,
    pub db: Connection,
    _dir: TempDir,
}

pub async fn test_app(calendar: FakeCalendar) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("db");
    let db_path = db_path.to_str().unwrap();

    let db = async_db(db_path)
        .await
        .expect("Failed to connect to async db");
    db.call(|conn| {
        initialize_db(conn)?;
        Ok(())
    })
    .await
    .unwrap();

    let app_config = AppConfig {
        storage_path: dir.path().display().to_string(),
        db_path: db_path.to_string(),
        google_client_id: String::from("test_client_id"),
        google_client_secret: String::from("test_client_secret"),
        google_api_url: String::from("http://localhost:1"),
        google_oauth_url: String::from("http://localhost:1"),
        calendar_fetch_timeout: Duration::from_secs(1),
    };
    let app_state = AppState::new(db.clone(), app_config, Arc::new(calendar));
    TestApp {
        router: app(Arc::new(RwLock::new(app_state))),
        db,
        _dir: dir,
    }
}

/// Create a club with the given members. Members listed in
/// `connected` also get a Google calendar connection.
pub async fn seed_club(db: &Connection, members: &[&str], connected: &[&str]) -> Club {
    let club = create_club(db, "Tuesday Drams").await.unwrap();
    for user_id in members {
        add_member(
            db,
            &club.id,
            User {
                id: user_id.to_string(),
                name: Some(format!("Member {}", user_id)),
                email: None,
            },
        )
        .await
        .unwrap();
    }
    let expires_at = Utc::now() + chrono::Duration::hours(1);
    for user_id in connected {
        upsert_calendar_connection(db, user_id, "access", Some("refresh"), expires_at)
            .await
            .unwrap();
    }
    club
}

pub fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_to_json(body: Body) -> serde_json::Value {
    serde_json::from_str(&body_to_string(body).await).unwrap()
}
