//! Response DTOs for availability endpoints.

use serde::Serialize;
use uuid::Uuid;

use crate::models::OperatingHours;

use super::engine::{HoursWindow, SlotCheck};

/// One operating window for JSON responses
#[derive(Debug, Serialize)]
pub struct HoursWindowResponse {
    pub day: String,
    pub start: String,
    pub end: String,
}

impl From<&OperatingHours> for HoursWindowResponse {
    fn from(hours: &OperatingHours) -> Self {
        Self {
            day: hours.day_of_week.to_string().to_lowercase(),
            start: hours.start_time.format("%H:%M").to_string(),
            end: hours.end_time.format("%H:%M").to_string(),
        }
    }
}

/// A provider's weekly hours
#[derive(Debug, Serialize)]
pub struct ProviderHoursResponse {
    pub provider_id: Uuid,
    pub windows: Vec<HoursWindowResponse>,
}

/// Verdict of a slot check.
///
/// The day's windows are included on `outside_hours` so the caller can show
/// when the provider is actually open.
#[derive(Debug, Serialize)]
pub struct SlotCheckResponse {
    pub verdict: &'static str,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windows: Option<Vec<WindowResponse>>,
}

/// An open window reported on `outside_hours`
#[derive(Debug, Serialize)]
pub struct WindowResponse {
    pub start: String,
    pub end: String,
}

impl From<SlotCheck> for SlotCheckResponse {
    fn from(verdict: SlotCheck) -> Self {
        let kind = verdict.kind();
        let available = verdict.is_available();
        let windows = match verdict {
            SlotCheck::OutsideHours(windows) => Some(
                windows
                    .iter()
                    .map(|w: &HoursWindow| WindowResponse {
                        start: w.start.format("%H:%M").to_string(),
                        end: w.end.format("%H:%M").to_string(),
                    })
                    .collect(),
            ),
            _ => None,
        };
        Self {
            verdict: kind,
            available,
            windows,
        }
    }
}
