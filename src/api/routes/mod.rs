//! API routes module

pub mod calendar;
pub mod clubs;

use axum::Router;

use crate::api::state::SharedState;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Calendar connection routes
        .nest("/calendar", calendar::router())
        // Club routes
        .nest("/clubs", clubs::router())
}
