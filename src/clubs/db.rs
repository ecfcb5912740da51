//! Database queries for clubs, members and calendar connections
use anyhow::{Error, Result};
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, params};
use tokio_rusqlite::Connection;
use uuid::Uuid;

use super::models::{CalendarConnection, Club, MemberConnection, PROVIDER_GOOGLE, User};

fn connection_from_row(
    row: &rusqlite::Row,
    offset: usize,
) -> Result<CalendarConnection, rusqlite::Error> {
    Ok(CalendarConnection {
        id: row.get(offset)?,
        user_id: row.get(offset + 1)?,
        provider: row.get(offset + 2)?,
        access_token: row.get(offset + 3)?,
        refresh_token: row.get(offset + 4)?,
        expires_at: row.get(offset + 5)?,
    })
}

pub async fn find_club(db: &Connection, club_id: &str) -> Result<Option<Club>, Error> {
    let club_id = club_id.to_string();
    let club = db
        .call(move |conn| {
            let club = conn
                .query_row(
                    "SELECT id, name FROM club WHERE id = ?1",
                    [&club_id],
                    |row| {
                        Ok(Club {
                            id: row.get(0)?,
                            name: row.get(1)?,
                        })
                    },
                )
                .optional()?;
            Ok(club)
        })
        .await?;
    Ok(club)
}

pub async fn is_member(db: &Connection, club_id: &str, user_id: &str) -> Result<bool, Error> {
    let club_id = club_id.to_string();
    let user_id = user_id.to_string();
    let found = db
        .call(move |conn| {
            let found = conn
                .query_row(
                    "SELECT 1 FROM club_member WHERE club_id = ?1 AND user_id = ?2",
                    params![club_id, user_id],
                    |_| Ok(()),
                )
                .optional()?;
            Ok(found.is_some())
        })
        .await?;
    Ok(found)
}

/// Members of the club joined with their Google calendar
/// connection. Members without a connection are left out.
pub async fn find_member_connections(
    db: &Connection,
    club_id: &str,
) -> Result<Vec<MemberConnection>, Error> {
    let club_id = club_id.to_string();
    let members = db
        .call(move |conn| {
            let mut stmt = conn.prepare(
                r"
          SELECT
            u.id,
            u.name,
            u.email,
            c.id,
            c.user_id,
            c.provider,
            c.access_token,
            c.refresh_token,
            c.expires_at
          FROM club_member m
          JOIN user u ON u.id = m.user_id
          JOIN calendar_connection c ON c.user_id = m.user_id AND c.provider = ?2
          WHERE m.club_id = ?1
          ORDER BY m.joined_at, u.id
        ",
            )?;
            let rows = stmt
                .query_map(params![club_id, PROVIDER_GOOGLE], |row| {
                    let user = User {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                    };
                    Ok(MemberConnection {
                        user_id: user.id.clone(),
                        user_name: user.display_name(),
                        connection: connection_from_row(row, 3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await?;
    Ok(members)
}

pub async fn find_calendar_connection(
    db: &Connection,
    user_id: &str,
) -> Result<Option<CalendarConnection>, Error> {
    let user_id = user_id.to_string();
    let connection = db
        .call(move |conn| {
            let connection = conn
                .query_row(
                    r"
          SELECT id, user_id, provider, access_token, refresh_token, expires_at
          FROM calendar_connection
          WHERE user_id = ?1 AND provider = ?2
        ",
                    params![user_id, PROVIDER_GOOGLE],
                    |row| connection_from_row(row, 0),
                )
                .optional()?;
            Ok(connection)
        })
        .await?;
    Ok(connection)
}

pub async fn upsert_calendar_connection(
    db: &Connection,
    user_id: &str,
    access_token: &str,
    refresh_token: Option<&str>,
    expires_at: DateTime<Utc>,
) -> Result<(), Error> {
    let id = Uuid::new_v4().to_string();
    let user_id = user_id.to_string();
    let access_token = access_token.to_string();
    let refresh_token = refresh_token.map(|s| s.to_string());
    db.call(move |conn| {
        conn.execute(
            "INSERT INTO calendar_connection (id, user_id, provider, access_token, refresh_token, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(user_id, provider) DO UPDATE SET
               access_token = excluded.access_token,
               refresh_token = COALESCE(excluded.refresh_token, calendar_connection.refresh_token),
               expires_at = excluded.expires_at",
            params![
                id,
                user_id,
                PROVIDER_GOOGLE,
                access_token,
                refresh_token,
                expires_at
            ],
        )?;
        Ok(())
    })
    .await?;
    Ok(())
}

/// Remove the user's Google connection. Returns the number of rows
/// deleted.
pub async fn delete_calendar_connection(db: &Connection, user_id: &str) -> Result<usize, Error> {
    let user_id = user_id.to_string();
    let deleted = db
        .call(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM calendar_connection WHERE user_id = ?1 AND provider = ?2",
                params![user_id, PROVIDER_GOOGLE],
            )?;
            Ok(deleted)
        })
        .await?;
    Ok(deleted)
}

pub async fn create_club(db: &Connection, name: &str) -> Result<Club, Error> {
    let club = Club {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
    };
    let row = club.clone();
    db.call(move |conn| {
        conn.execute(
            "INSERT INTO club (id, name) VALUES (?1, ?2)",
            params![row.id, row.name],
        )?;
        Ok(())
    })
    .await?;
    Ok(club)
}

/// Add a user to a club, creating or updating the user row.
pub async fn add_member(db: &Connection, club_id: &str, user: User) -> Result<(), Error> {
    let club_id = club_id.to_string();
    db.call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO user (id, name, email) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
               name = COALESCE(excluded.name, user.name),
               email = COALESCE(excluded.email, user.email)",
            params![user.id, user.name, user.email],
        )?;
        tx.execute(
            "INSERT OR IGNORE INTO club_member (club_id, user_id) VALUES (?1, ?2)",
            params![club_id, user.id],
        )?;
        tx.commit()?;
        Ok(())
    })
    .await?;
    Ok(())
}
