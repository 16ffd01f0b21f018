//! Request DTOs for availability endpoints.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

/// Query parameters for a slot check
#[derive(Debug, Deserialize)]
pub struct CheckSlotQuery {
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    pub exclude_booking_id: Option<Uuid>,
}

/// One operating window in an hours update
#[derive(Debug, Deserialize)]
pub struct HoursWindowRequest {
    /// Weekday name ("monday", "tue", ...)
    pub day: String,
    pub start: String,
    pub end: String,
}

/// Request to replace a provider's weekly hours
#[derive(Debug, Deserialize)]
pub struct SetHoursRequest {
    pub windows: Vec<HoursWindowRequest>,
}
