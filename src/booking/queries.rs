//! Database queries for bookings.
//!
//! Status-changing updates are compare-and-set on the stored status so a
//! concurrent transition cannot be silently overwritten.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

use super::models::BookingRow;

const BOOKING_COLUMNS: &str = r#"
    id, provider_id, owner_id, service_id, pricing_option_id,
    pet_type, size_key, date, time_slot, price, status,
    rejection_reason, payment_proof_ref, reference_number,
    created_at, updated_at
"#;

/// Parameters for a new booking row
pub struct NewBookingRecord<'a> {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub owner_id: Uuid,
    pub service_id: Uuid,
    pub pricing_option_id: Uuid,
    pub pet_type: &'a str,
    pub size_key: &'a str,
    pub date: NaiveDate,
    pub time_slot: NaiveTime,
    pub price: Decimal,
}

/// Insert a booking in the pending state.
///
/// The partial unique index on active-hold slots makes this the authoritative
/// double-booking check; a violation bubbles up as a database error for the
/// service layer to translate.
pub async fn insert_booking(
    pool: &PgPool,
    record: NewBookingRecord<'_>,
) -> Result<BookingRow, AppError> {
    let row = sqlx::query_as::<_, BookingRow>(&format!(
        r#"
        INSERT INTO bookings (
            id, provider_id, owner_id, service_id, pricing_option_id,
            pet_type, size_key, date, time_slot, price, status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'pending')
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(record.id)
    .bind(record.provider_id)
    .bind(record.owner_id)
    .bind(record.service_id)
    .bind(record.pricing_option_id)
    .bind(record.pet_type)
    .bind(record.size_key)
    .bind(record.date)
    .bind(record.time_slot)
    .bind(record.price)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Get a booking by id
pub async fn get_booking(pool: &PgPool, booking_id: Uuid) -> Result<Option<BookingRow>, AppError> {
    let row = sqlx::query_as::<_, BookingRow>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE id = $1
        "#
    ))
    .bind(booking_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Move a booking to a new status, recording any event payload.
///
/// Returns `None` when the stored status no longer matches `expected`
/// (a concurrent transition won).
pub async fn apply_transition(
    pool: &PgPool,
    booking_id: Uuid,
    expected: &str,
    next: &str,
    rejection_reason: Option<&str>,
    payment_proof_ref: Option<&str>,
    reference_number: Option<&str>,
) -> Result<Option<BookingRow>, AppError> {
    let row = sqlx::query_as::<_, BookingRow>(&format!(
        r#"
        UPDATE bookings
        SET status = $3,
            rejection_reason = COALESCE($4, rejection_reason),
            payment_proof_ref = COALESCE($5, payment_proof_ref),
            reference_number = COALESCE($6, reference_number),
            updated_at = NOW()
        WHERE id = $1 AND status = $2
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(booking_id)
    .bind(expected)
    .bind(next)
    .bind(rejection_reason)
    .bind(payment_proof_ref)
    .bind(reference_number)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Move a booking to a new slot, keeping its status.
///
/// Returns `None` when the stored status no longer matches `expected`. The
/// active-hold unique index also guards this update.
pub async fn update_slot(
    pool: &PgPool,
    booking_id: Uuid,
    expected: &str,
    date: NaiveDate,
    time_slot: NaiveTime,
) -> Result<Option<BookingRow>, AppError> {
    let row = sqlx::query_as::<_, BookingRow>(&format!(
        r#"
        UPDATE bookings
        SET date = $3, time_slot = $4, updated_at = NOW()
        WHERE id = $1 AND status = $2
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(booking_id)
    .bind(expected)
    .bind(date)
    .bind(time_slot)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// All bookings placed by an owner, newest first
pub async fn list_for_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<BookingRow>, AppError> {
    let rows = sqlx::query_as::<_, BookingRow>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE owner_id = $1
        ORDER BY created_at DESC
        "#
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// All bookings for a provider, soonest appointment first
pub async fn list_for_provider(
    pool: &PgPool,
    provider_id: Uuid,
) -> Result<Vec<BookingRow>, AppError> {
    let rows = sqlx::query_as::<_, BookingRow>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE provider_id = $1
        ORDER BY date, time_slot
        "#
    ))
    .bind(provider_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
