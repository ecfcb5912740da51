pub mod api;
pub mod availability;
pub mod cli;
pub mod clubs;
pub mod core;
pub mod google;
