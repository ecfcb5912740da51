//! Meeting time suggestions from club members' free/busy data
pub mod error;
pub mod finder;
pub mod models;
pub mod source;
pub mod window;

pub use error::AvailabilityError;
pub use finder::{find_slots, overlaps};
pub use models::*;
pub use source::{CalendarSource, collect_busy_intervals, suggest_slots};
pub use window::TimeOfDayWindow;
