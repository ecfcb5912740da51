//! Google OAuth token refresh
use anyhow::{Error, Result};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    // Seconds until the access token expires
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub token_type: Option<String>,
}

/// Exchange a refresh token for a new access token. `oauth_url` is the
/// token host, e.g. `https://oauth2.googleapis.com`.
pub async fn refresh_access_token(
    oauth_url: &str,
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> Result<OAuthToken, Error> {
    let params = [
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("refresh_token", refresh_token),
        ("grant_type", "refresh_token"),
    ];
    let token = Client::new()
        .post(format!("{}/token", oauth_url))
        .form(&params)
        .send()
        .await?
        .error_for_status()?
        .json::<OAuthToken>()
        .await?;
    Ok(token)
}
