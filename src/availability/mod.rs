//! Availability engine: operating hours and slot checks.

pub mod engine;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use engine::{check_slot, parse_time_slot, HoursWindow, SlotCheck, SlotHold};
pub use routes::router;
pub use services::check_provider_slot;
