//! Database queries for the availability engine.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

use super::engine::SlotHold;

/// Bookings holding slots for a provider on a date.
///
/// Only active-hold statuses reserve a slot; declined, voided, cancelled and
/// completed bookings release theirs.
pub async fn active_holds(
    pool: &PgPool,
    provider_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<SlotHold>, AppError> {
    let holds = sqlx::query_as::<_, SlotHold>(
        r#"
        SELECT id AS booking_id, date, time_slot
        FROM bookings
        WHERE provider_id = $1
          AND date = $2
          AND status IN ('pending', 'approved', 'awaiting_verification', 'paid')
        "#,
    )
    .bind(provider_id)
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(holds)
}
