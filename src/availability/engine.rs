//! Slot availability checks.
//!
//! Pure read-then-decide logic with no hidden state: the caller supplies the
//! provider's operating hours and the bookings currently holding slots. The
//! verdict is advisory for UI display; the partial unique index on the
//! bookings table is what actually prevents a double write (see migrations).

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::models::OperatingHours;

/// One open window on a day, reported back on `OutsideHours`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoursWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl fmt::Display for HoursWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// A booking currently holding a provider time slot
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SlotHold {
    pub booking_id: Uuid,
    pub date: NaiveDate,
    pub time_slot: NaiveTime,
}

/// Verdict of a slot check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotCheck {
    Available,
    ClosedDay,
    OutsideHours(Vec<HoursWindow>),
    SlotTaken,
}

impl SlotCheck {
    /// Stable verdict name for responses
    pub fn kind(&self) -> &'static str {
        match self {
            SlotCheck::Available => "available",
            SlotCheck::ClosedDay => "closed_day",
            SlotCheck::OutsideHours(_) => "outside_hours",
            SlotCheck::SlotTaken => "slot_taken",
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, SlotCheck::Available)
    }

    /// Turn a rejection into an error, for write paths that require the slot
    pub fn into_result(self) -> Result<(), crate::error::AppError> {
        if self.is_available() {
            Ok(())
        } else {
            Err(crate::error::AppError::Slot(self))
        }
    }
}

impl fmt::Display for SlotCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotCheck::Available => write!(f, "slot is available"),
            SlotCheck::ClosedDay => write!(f, "provider is closed on the requested day"),
            SlotCheck::OutsideHours(_) => {
                write!(f, "requested time falls outside the provider's operating hours")
            }
            SlotCheck::SlotTaken => write!(f, "another booking already holds this time slot"),
        }
    }
}

/// Parse a requested time slot ("10:00" or "10:00:00")
pub fn parse_time_slot(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Decide whether a requested slot is bookable.
///
/// `hours` and `holds` must already be scoped to the provider being checked.
/// The requested time must fall within `[start, end)` of at least one window
/// on that weekday; `exclude` skips the booking being rescheduled so it does
/// not collide with itself.
pub fn check_slot(
    date: NaiveDate,
    time_slot: NaiveTime,
    hours: &[OperatingHours],
    holds: &[SlotHold],
    exclude: Option<Uuid>,
) -> SlotCheck {
    let weekday = date.weekday();
    let mut windows: Vec<HoursWindow> = hours
        .iter()
        .filter(|h| h.day_of_week == weekday)
        .map(|h| HoursWindow {
            start: h.start_time,
            end: h.end_time,
        })
        .collect();

    if windows.is_empty() {
        return SlotCheck::ClosedDay;
    }
    windows.sort_by_key(|w| w.start);

    let within = windows
        .iter()
        .any(|w| w.start <= time_slot && time_slot < w.end);
    if !within {
        return SlotCheck::OutsideHours(windows);
    }

    let taken = holds.iter().any(|hold| {
        hold.date == date && hold.time_slot == time_slot && Some(hold.booking_id) != exclude
    });
    if taken {
        return SlotCheck::SlotTaken;
    }

    SlotCheck::Available
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn window(day: Weekday, start: &str, end: &str) -> OperatingHours {
        OperatingHours {
            provider_id: Uuid::nil(),
            day_of_week: day,
            start_time: parse_time_slot(start).unwrap(),
            end_time: parse_time_slot(end).unwrap(),
        }
    }

    fn hold(date: NaiveDate, time: &str) -> SlotHold {
        SlotHold {
            booking_id: Uuid::new_v4(),
            date,
            time_slot: parse_time_slot(time).unwrap(),
        }
    }

    // 2025-01-10 is a Friday.
    fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    // ==================== parse_time_slot tests ====================

    #[test]
    fn test_parse_time_slot_formats() {
        assert_eq!(
            parse_time_slot("10:00"),
            NaiveTime::from_hms_opt(10, 0, 0)
        );
        assert_eq!(
            parse_time_slot("10:30:00"),
            NaiveTime::from_hms_opt(10, 30, 0)
        );
        assert_eq!(parse_time_slot("25:00"), None);
        assert_eq!(parse_time_slot("not a time"), None);
    }

    // ==================== check_slot tests ====================

    #[test]
    fn test_closed_day_when_no_windows() {
        let hours = vec![window(Weekday::Mon, "09:00", "17:00")];
        let verdict = check_slot(
            friday(),
            parse_time_slot("10:00").unwrap(),
            &hours,
            &[],
            None,
        );
        assert_eq!(verdict, SlotCheck::ClosedDay);
    }

    #[test]
    fn test_outside_hours_reports_windows() {
        let hours = vec![window(Weekday::Fri, "09:00", "17:00")];
        let verdict = check_slot(
            friday(),
            parse_time_slot("18:00").unwrap(),
            &hours,
            &[],
            None,
        );
        match verdict {
            SlotCheck::OutsideHours(windows) => {
                assert_eq!(windows.len(), 1);
                assert_eq!(windows[0].to_string(), "09:00-17:00");
            }
            other => panic!("expected OutsideHours, got {:?}", other),
        }
    }

    #[test]
    fn test_window_start_inclusive_end_exclusive() {
        let hours = vec![window(Weekday::Fri, "09:00", "17:00")];
        let at_start = check_slot(friday(), parse_time_slot("09:00").unwrap(), &hours, &[], None);
        assert_eq!(at_start, SlotCheck::Available);

        let at_end = check_slot(friday(), parse_time_slot("17:00").unwrap(), &hours, &[], None);
        assert!(matches!(at_end, SlotCheck::OutsideHours(_)));
    }

    #[test]
    fn test_multiple_windows_on_one_day() {
        let hours = vec![
            window(Weekday::Fri, "14:00", "18:00"),
            window(Weekday::Fri, "09:00", "12:00"),
        ];
        let morning = check_slot(friday(), parse_time_slot("10:00").unwrap(), &hours, &[], None);
        assert_eq!(morning, SlotCheck::Available);

        let lunch = check_slot(friday(), parse_time_slot("12:30").unwrap(), &hours, &[], None);
        match lunch {
            SlotCheck::OutsideHours(windows) => {
                // Windows come back sorted for display.
                assert_eq!(windows[0].to_string(), "09:00-12:00");
                assert_eq!(windows[1].to_string(), "14:00-18:00");
            }
            other => panic!("expected OutsideHours, got {:?}", other),
        }
    }

    #[test]
    fn test_slot_taken_by_active_hold() {
        let hours = vec![window(Weekday::Fri, "09:00", "17:00")];
        let holds = vec![hold(friday(), "10:00")];
        let verdict = check_slot(
            friday(),
            parse_time_slot("10:00").unwrap(),
            &hours,
            &holds,
            None,
        );
        assert_eq!(verdict, SlotCheck::SlotTaken);
    }

    #[test]
    fn test_other_times_stay_available() {
        let hours = vec![window(Weekday::Fri, "09:00", "17:00")];
        let holds = vec![hold(friday(), "10:00")];
        let verdict = check_slot(
            friday(),
            parse_time_slot("11:00").unwrap(),
            &hours,
            &holds,
            None,
        );
        assert_eq!(verdict, SlotCheck::Available);
    }

    #[test]
    fn test_exclude_skips_own_booking_during_reschedule() {
        let hours = vec![window(Weekday::Fri, "09:00", "17:00")];
        let own = hold(friday(), "10:00");
        let verdict = check_slot(
            friday(),
            parse_time_slot("10:00").unwrap(),
            &hours,
            &[own.clone()],
            Some(own.booking_id),
        );
        assert_eq!(verdict, SlotCheck::Available);
    }

    #[test]
    fn test_check_is_idempotent() {
        let hours = vec![window(Weekday::Fri, "09:00", "17:00")];
        let holds = vec![hold(friday(), "10:00")];
        let first = check_slot(
            friday(),
            parse_time_slot("10:00").unwrap(),
            &hours,
            &holds,
            None,
        );
        let second = check_slot(
            friday(),
            parse_time_slot("10:00").unwrap(),
            &hours,
            &holds,
            None,
        );
        assert_eq!(first, second);
    }
}
