use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage_path: String,
    pub db_path: String,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_api_url: String,
    pub google_oauth_url: String,
    // Upper bound on a single member's calendar fetch
    pub calendar_fetch_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let storage_path = env::var("WN_STORAGE_PATH").unwrap_or("./".to_string());
        let db_path = format!("{}/db", storage_path);
        let google_client_id =
            env::var("WN_GOOGLE_CLIENT_ID").context("Missing env var WN_GOOGLE_CLIENT_ID")?;
        let google_client_secret = env::var("WN_GOOGLE_CLIENT_SECRET")
            .context("Missing env var WN_GOOGLE_CLIENT_SECRET")?;
        let google_api_url = env::var("WN_GOOGLE_API_URL")
            .unwrap_or_else(|_| "https://www.googleapis.com".to_string());
        let google_oauth_url = env::var("WN_GOOGLE_OAUTH_URL")
            .unwrap_or_else(|_| "https://oauth2.googleapis.com".to_string());
        let timeout_secs = env::var("WN_CALENDAR_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(10);

        Ok(Self {
            storage_path,
            db_path,
            google_client_id,
            google_client_secret,
            google_api_url,
            google_oauth_url,
            calendar_fetch_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
