//! Shared database access

pub mod queries;

pub use queries::{get_provider, operating_hours_rows, replace_operating_hours};
