//! Booking service functions with database access.
//!
//! Each operation re-reads the booking, derives its effective status for
//! "now", and rejects before writing anything. Slot-uniqueness violations
//! raised by the store are translated to the slot-taken rejection so callers
//! see one consistent error kind for a lost race.

use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::availability;
use crate::cache::AppCache;
use crate::catalog;
use crate::error::AppError;

use super::lifecycle::{self, InvalidTransition};
use super::models::{Actor, Booking, BookingEvent, BookingStatus};
use super::queries::{self, NewBookingRecord};

/// Input for creating a booking
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub provider_id: Uuid,
    pub owner_id: Uuid,
    pub service_id: Uuid,
    pub pet_type: catalog::PetType,
    pub size_key: catalog::SizeKey,
    pub date: NaiveDate,
    pub time_slot: NaiveTime,
}

/// Result of a lifecycle transition: the updated booking plus the effective
/// status it moved from (the caller uses this for the non-refundable warning)
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub booking: Booking,
    pub from: BookingStatus,
}

fn parse_booking(row: super::models::BookingRow) -> Result<Booking, AppError> {
    row.parse()
        .ok_or_else(|| AppError::Internal("corrupt booking row".to_string()))
}

fn slot_taken_on_unique_violation(err: AppError) -> AppError {
    match err {
        AppError::Database(sqlx::Error::Database(ref db)) if db.is_unique_violation() => {
            AppError::Slot(availability::SlotCheck::SlotTaken)
        }
        other => other,
    }
}

/// Create a booking in the pending state.
///
/// The price and pricing option are resolved server-side from the catalog,
/// never trusted from the caller, and the slot check runs immediately before
/// the insert. The insert still goes through the active-hold unique index,
/// so a race that slips past the advisory check comes back as slot-taken.
pub async fn create_booking(
    pool: &PgPool,
    cache: &AppCache,
    req: NewBooking,
) -> Result<Booking, AppError> {
    let service = catalog::services::get_service(pool, req.service_id).await?;
    if service.provider_id != req.provider_id {
        return Err(AppError::NotFound);
    }

    let (pricing_option_id, price) = catalog::services::resolve_service_price(
        pool,
        cache,
        req.service_id,
        req.pet_type,
        req.size_key,
    )
    .await?;

    availability::check_provider_slot(
        pool,
        cache,
        req.provider_id,
        req.date,
        req.time_slot,
        None,
    )
    .await?
    .into_result()?;

    let row = queries::insert_booking(
        pool,
        NewBookingRecord {
            id: Uuid::new_v4(),
            provider_id: req.provider_id,
            owner_id: req.owner_id,
            service_id: req.service_id,
            pricing_option_id,
            pet_type: req.pet_type.as_str(),
            size_key: req.size_key.as_str(),
            date: req.date,
            time_slot: req.time_slot,
            price,
        },
    )
    .await
    .map_err(slot_taken_on_unique_violation)?;

    let booking = parse_booking(row)?;
    info!(
        "Created booking {} for provider {} on {} {}",
        booking.id,
        booking.provider_id,
        booking.date,
        booking.time_slot.format("%H:%M")
    );
    Ok(booking)
}

/// Get a booking by id
pub async fn get_booking(pool: &PgPool, booking_id: Uuid) -> Result<Booking, AppError> {
    let row = queries::get_booking(pool, booking_id)
        .await?
        .ok_or(AppError::NotFound)?;
    parse_booking(row)
}

fn authorize(booking: &Booking, actor: Actor, actor_id: Uuid) -> Result<(), AppError> {
    let expected = match actor {
        Actor::Owner => booking.owner_id,
        Actor::Provider => booking.provider_id,
    };
    // A caller acting on someone else's booking learns nothing beyond "not
    // yours to see".
    if expected != actor_id {
        return Err(AppError::NotFound);
    }
    Ok(())
}

fn validate_event(event: &BookingEvent) -> Result<(), AppError> {
    match event {
        BookingEvent::Decline { reason } | BookingEvent::VoidPayment { reason }
            if reason.trim().is_empty() =>
        {
            Err(AppError::Validation("a reason is required".to_string()))
        }
        BookingEvent::SubmitPaymentProof {
            proof_ref,
            reference_number,
        } if proof_ref.trim().is_empty() || reference_number.trim().is_empty() => {
            Err(AppError::Validation(
                "payment proof and reference number are required".to_string(),
            ))
        }
        _ => Ok(()),
    }
}

/// Drive a booking through one lifecycle transition.
///
/// The effective status (time-derived completion included) is what the
/// transition table sees, so events against an already-completed booking are
/// rejected even though the store still says paid.
pub async fn transition(
    pool: &PgPool,
    booking_id: Uuid,
    actor: Actor,
    actor_id: Uuid,
    event: BookingEvent,
) -> Result<TransitionOutcome, AppError> {
    let booking = get_booking(pool, booking_id).await?;
    authorize(&booking, actor, actor_id)?;
    validate_event(&event)?;

    let effective = lifecycle::classify(&booking, Utc::now().naive_utc());
    let next = lifecycle::apply(effective, actor, &event)?;

    let (reason, proof_ref, reference_number) = match &event {
        BookingEvent::Decline { reason } | BookingEvent::VoidPayment { reason } => {
            (Some(reason.as_str()), None, None)
        }
        BookingEvent::SubmitPaymentProof {
            proof_ref,
            reference_number,
        } => (None, Some(proof_ref.as_str()), Some(reference_number.as_str())),
        _ => (None, None, None),
    };

    let row = queries::apply_transition(
        pool,
        booking_id,
        booking.status.as_str(),
        next.as_str(),
        reason,
        proof_ref,
        reference_number,
    )
    .await?
    // The stored status moved between our read and this write.
    .ok_or(AppError::Transition(InvalidTransition {
        from: effective,
        actor,
        event: event.name(),
    }))?;

    let updated = parse_booking(row)?;
    info!(
        "Booking {} moved {} -> {} by {}",
        booking_id, effective, next, actor
    );
    Ok(TransitionOutcome {
        booking: updated,
        from: effective,
    })
}

/// Move a booking to a new date and time.
///
/// Allowed from any active-hold effective state; the slot check runs against
/// live hours and holds with the booking itself excluded. Any rejection
/// leaves the booking exactly as it was.
pub async fn reschedule(
    pool: &PgPool,
    cache: &AppCache,
    booking_id: Uuid,
    actor: Actor,
    actor_id: Uuid,
    new_date: NaiveDate,
    new_time: NaiveTime,
) -> Result<Booking, AppError> {
    let booking = get_booking(pool, booking_id).await?;
    authorize(&booking, actor, actor_id)?;

    let effective = lifecycle::classify(&booking, Utc::now().naive_utc());
    if !lifecycle::is_reschedulable(effective) {
        return Err(AppError::Transition(InvalidTransition {
            from: effective,
            actor,
            event: "reschedule",
        }));
    }

    availability::check_provider_slot(
        pool,
        cache,
        booking.provider_id,
        new_date,
        new_time,
        Some(booking_id),
    )
    .await?
    .into_result()?;

    let row = queries::update_slot(
        pool,
        booking_id,
        booking.status.as_str(),
        new_date,
        new_time,
    )
    .await
    .map_err(slot_taken_on_unique_violation)?
    .ok_or(AppError::Transition(InvalidTransition {
        from: effective,
        actor,
        event: "reschedule",
    }))?;

    let updated = parse_booking(row)?;
    info!(
        "Booking {} rescheduled to {} {} by {}",
        booking_id,
        new_date,
        new_time.format("%H:%M"),
        actor
    );
    Ok(updated)
}

/// An owner's bookings, newest first
pub async fn list_for_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Booking>, AppError> {
    queries::list_for_owner(pool, owner_id)
        .await?
        .into_iter()
        .map(parse_booking)
        .collect()
}

/// A provider's bookings for the review dashboard, optionally filtered by
/// effective status.
///
/// Filtering happens after classification so a "paid" filter excludes
/// appointments the clock has already completed and a "completed" filter
/// finds them.
pub async fn list_for_provider(
    pool: &PgPool,
    provider_id: Uuid,
    status: Option<BookingStatus>,
) -> Result<Vec<Booking>, AppError> {
    let now = Utc::now().naive_utc();
    let bookings: Vec<Booking> = queries::list_for_provider(pool, provider_id)
        .await?
        .into_iter()
        .map(parse_booking)
        .collect::<Result<_, _>>()?;

    Ok(match status {
        Some(wanted) => bookings
            .into_iter()
            .filter(|b| lifecycle::classify(b, now) == wanted)
            .collect(),
        None => bookings,
    })
}
