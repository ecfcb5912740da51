use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const PROVIDER_GOOGLE: &str = "google";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Club {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl User {
    /// Name to show for the user, falling back to email then id.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| self.id.clone())
    }
}

/// A user's link to an external calendar provider.
#[derive(Debug, Clone)]
pub struct CalendarConnection {
    pub id: String,
    pub user_id: String,
    pub provider: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

/// A club member that has a usable calendar connection.
#[derive(Debug, Clone)]
pub struct MemberConnection {
    pub user_id: String,
    pub user_name: String,
    pub connection: CalendarConnection,
}
