use anyhow::{Result, anyhow};
use chrono::Utc;
use std::io::{self, Write};

use crate::clubs::upsert_calendar_connection;
use crate::core::db::async_db;

/// Store a Google refresh token for the user. The access token is
/// left expired so the first calendar fetch refreshes it.
pub async fn run(user_id: &str, db_path: &str) -> Result<()> {
    print!("Paste the Google Calendar refresh token for {}: ", user_id);
    io::stdout().flush()?;
    let mut refresh_token = String::new();
    io::stdin().read_line(&mut refresh_token)?;
    let refresh_token = refresh_token.trim();
    if refresh_token.is_empty() {
        return Err(anyhow!("No refresh token provided"));
    }

    let db = async_db(db_path).await?;
    upsert_calendar_connection(&db, user_id, "", Some(refresh_token), Utc::now()).await?;
    println!("Calendar connection for {} saved to DB.", user_id);
    Ok(())
}
