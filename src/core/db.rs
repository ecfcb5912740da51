//! SQLite connection and schema
use anyhow::{Error, Result};
use std::fs;
use std::path::Path;
use tokio_rusqlite::Connection;

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS user (
    id TEXT PRIMARY KEY,
    name TEXT,
    email TEXT
);

CREATE TABLE IF NOT EXISTS club (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS club_member (
    club_id TEXT NOT NULL REFERENCES club(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL REFERENCES user(id) ON DELETE CASCADE,
    role TEXT NOT NULL DEFAULT 'member',
    joined_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY (club_id, user_id)
);

CREATE TABLE IF NOT EXISTS calendar_connection (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES user(id) ON DELETE CASCADE,
    provider TEXT NOT NULL,
    access_token TEXT NOT NULL,
    refresh_token TEXT,
    expires_at TEXT NOT NULL,
    UNIQUE (user_id, provider)
);
";

/// Open the database file in `db_dir`, creating the directory if
/// needed.
pub async fn async_db(db_dir: &str) -> Result<Connection, Error> {
    fs::create_dir_all(db_dir)?;
    let db_file = Path::new(db_dir).join("whiskey_night.sqlite");
    let db = Connection::open(db_file).await?;
    db.call(|conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(())
    })
    .await?;
    Ok(db)
}

/// Create all tables. Safe to run more than once.
pub fn initialize_db(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA)
}
