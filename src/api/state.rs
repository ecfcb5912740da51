use std::sync::{Arc, RwLock};

use tokio_rusqlite::Connection;

use crate::availability::CalendarSource;
use crate::core::AppConfig;

pub type SharedState = Arc<RwLock<AppState>>;

pub struct AppState {
    pub db: Connection,
    pub config: AppConfig,
    // Where members' free/busy data comes from
    pub calendar: Arc<dyn CalendarSource>,
}

impl AppState {
    pub fn new(db: Connection, config: AppConfig, calendar: Arc<dyn CalendarSource>) -> Self {
        Self {
            db,
            config,
            calendar,
        }
    }
}
