//! Availability service functions with database access.

use chrono::{NaiveDate, NaiveTime, Weekday};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::cache::AppCache;
use crate::db;
use crate::error::AppError;
use crate::models::OperatingHours;

use super::engine::{check_slot, SlotCheck};
use super::queries;

/// A provider's operating hours, through the cache
pub async fn provider_hours(
    pool: &PgPool,
    cache: &AppCache,
    provider_id: Uuid,
) -> Result<Arc<Vec<OperatingHours>>, AppError> {
    if let Some(cached) = cache.hours.get(&provider_id).await {
        return Ok(cached);
    }
    let rows = db::queries::operating_hours_rows(pool, provider_id).await?;
    let hours: Vec<OperatingHours> = rows
        .into_iter()
        .map(|row| {
            row.parse()
                .ok_or_else(|| AppError::Internal("corrupt operating hours row".to_string()))
        })
        .collect::<Result<_, _>>()?;
    let hours = Arc::new(hours);
    cache.hours.insert(provider_id, hours.clone()).await;
    Ok(hours)
}

/// Run the slot check for a provider against live hours and holds.
///
/// Re-executed at booking-creation time and at reschedule time; the result
/// is advisory and the storage-level uniqueness constraint has the final
/// word on writes.
pub async fn check_provider_slot(
    pool: &PgPool,
    cache: &AppCache,
    provider_id: Uuid,
    date: NaiveDate,
    time_slot: NaiveTime,
    exclude_booking_id: Option<Uuid>,
) -> Result<SlotCheck, AppError> {
    db::queries::get_provider(pool, provider_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let hours = provider_hours(pool, cache, provider_id).await?;
    let holds = queries::active_holds(pool, provider_id, date).await?;
    Ok(check_slot(date, time_slot, &hours, &holds, exclude_booking_id))
}

/// Replace a provider's weekly operating hours.
///
/// Windows are validated before the existing rows are touched; the swap runs
/// in one transaction.
pub async fn set_provider_hours(
    pool: &PgPool,
    cache: &AppCache,
    provider_id: Uuid,
    windows: Vec<(Weekday, NaiveTime, NaiveTime)>,
) -> Result<Vec<OperatingHours>, AppError> {
    db::queries::get_provider(pool, provider_id)
        .await?
        .ok_or(AppError::NotFound)?;
    for (day, start, end) in &windows {
        if start >= end {
            return Err(AppError::Validation(format!(
                "operating window on {} must start before it ends",
                day
            )));
        }
    }

    db::queries::replace_operating_hours(pool, provider_id, &windows).await?;
    cache.invalidate_provider_hours(provider_id).await;
    info!(
        "Replaced operating hours for provider {} ({} windows)",
        provider_id,
        windows.len()
    );

    Ok(windows
        .into_iter()
        .map(|(day, start, end)| OperatingHours {
            provider_id,
            day_of_week: day,
            start_time: start,
            end_time: end,
        })
        .collect())
}
