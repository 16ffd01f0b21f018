//! Shared domain models

pub mod provider;

pub use provider::{weekday_from_index, weekday_index, OperatingHours, OperatingHoursRow, Provider};
