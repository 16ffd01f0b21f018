//! Booking lifecycle: creation, state machine transitions, reschedules.

pub mod lifecycle;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use lifecycle::{apply, classify, InvalidTransition, COMPLETION_LAG_HOURS};
pub use models::{Actor, Booking, BookingEvent, BookingStatus};
pub use routes::router;
