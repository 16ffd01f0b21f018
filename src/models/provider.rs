//! Provider and operating-hours models

use chrono::{NaiveTime, Weekday};
use sqlx::FromRow;
use uuid::Uuid;

/// Grooming provider from database
#[derive(Debug, Clone, FromRow)]
pub struct Provider {
    pub id: Uuid,
    pub business_name: String,
    pub active: bool,
}

/// One operating window for a provider on one weekday.
///
/// A provider may have several disjoint windows on the same day; a day with
/// no rows at all means the provider is closed that day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatingHours {
    pub provider_id: Uuid,
    pub day_of_week: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Operating hours row from database (weekday stored as 0 = Monday)
#[derive(Debug, Clone, FromRow)]
pub struct OperatingHoursRow {
    pub provider_id: Uuid,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl OperatingHoursRow {
    /// Parse the stored weekday index into a typed window
    pub fn parse(self) -> Option<OperatingHours> {
        Some(OperatingHours {
            provider_id: self.provider_id,
            day_of_week: weekday_from_index(self.day_of_week)?,
            start_time: self.start_time,
            end_time: self.end_time,
        })
    }
}

/// Weekday to stored index (0 = Monday .. 6 = Sunday)
pub fn weekday_index(day: Weekday) -> i16 {
    day.num_days_from_monday() as i16
}

/// Stored index back to weekday
pub fn weekday_from_index(index: i16) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_index_round_trip() {
        for day in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            assert_eq!(weekday_from_index(weekday_index(day)), Some(day));
        }
    }

    #[test]
    fn test_weekday_from_invalid_index() {
        assert_eq!(weekday_from_index(7), None);
        assert_eq!(weekday_from_index(-1), None);
    }
}
