//! Booking lifecycle state machine.
//!
//! Pure transition logic - no database access. Owner and provider mutate the
//! same booking under different permissions, so every transition is keyed on
//! (state, actor, event); anything not in the table is rejected with no
//! mutation. The time-derived `Completed` state is computed by [`classify`]
//! alone so every read path derives it the same way.

use chrono::{Duration, NaiveDateTime};

use super::models::{Actor, Booking, BookingEvent, BookingStatus};

/// A paid appointment counts as completed this long after its start time
pub const COMPLETION_LAG_HOURS: i64 = 4;

/// Rejected transition: the event does not apply to the booking's state for
/// that actor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{actor} cannot {event} a booking in the {from} state")]
pub struct InvalidTransition {
    pub from: BookingStatus,
    pub actor: Actor,
    pub event: &'static str,
}

/// Apply an event to a booking status.
///
/// Returns the next status or rejects deterministically; callers persist the
/// result only on `Ok` (reject-before-write).
pub fn apply(
    from: BookingStatus,
    actor: Actor,
    event: &BookingEvent,
) -> Result<BookingStatus, InvalidTransition> {
    use BookingStatus::*;

    let next = match (from, actor, event) {
        (Pending, Actor::Provider, BookingEvent::Approve) => Approved,
        (Pending, Actor::Provider, BookingEvent::Decline { .. }) => Declined,
        (Pending, Actor::Owner, BookingEvent::Cancel) => Cancelled,
        (Approved, Actor::Owner, BookingEvent::SubmitPaymentProof { .. }) => AwaitingVerification,
        (Approved, Actor::Owner, BookingEvent::Cancel) => Cancelled,
        (AwaitingVerification, Actor::Provider, BookingEvent::AcceptPayment) => Paid,
        (AwaitingVerification, Actor::Provider, BookingEvent::VoidPayment { .. }) => Voided,
        // Paid cancellations go through; the deposit is not refunded and the
        // response flags that for the caller to warn about.
        (Paid, Actor::Owner, BookingEvent::Cancel) => Cancelled,
        _ => {
            return Err(InvalidTransition {
                from,
                actor,
                event: event.name(),
            })
        }
    };
    Ok(next)
}

/// Effective status of a booking at `now`.
///
/// A paid appointment becomes `Completed` once the clock passes its start
/// time plus [`COMPLETION_LAG_HOURS`]. Idempotent and side-effect free:
/// before the threshold it keeps returning `Paid` no matter how often it is
/// called, and the derived value is never written back to the store.
pub fn classify(booking: &Booking, now: NaiveDateTime) -> BookingStatus {
    if booking.status == BookingStatus::Paid {
        let appointment = booking.date.and_time(booking.time_slot);
        if now - appointment >= Duration::hours(COMPLETION_LAG_HOURS) {
            return BookingStatus::Completed;
        }
    }
    booking.status
}

/// May the booking move to a new slot from this effective status?
pub fn is_reschedulable(effective: BookingStatus) -> bool {
    effective.is_active_hold() && effective != BookingStatus::Completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::engine::{check_slot, parse_time_slot, SlotCheck};
    use crate::catalog::models::{OptionInput, PetType, SizeKey, WeightRange};
    use crate::catalog::rules::{resolve_price, validate_option};
    use crate::models::OperatingHours;
    use chrono::{NaiveDate, Utc, Weekday};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn booking(status: BookingStatus, date: &str, time: &str) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            pricing_option_id: Uuid::new_v4(),
            pet_type: PetType::Dog,
            size_key: SizeKey::Medium,
            date: date.parse().unwrap(),
            time_slot: parse_time_slot(time).unwrap(),
            price: dec!(600),
            status,
            rejection_reason: None,
            payment_proof_ref: None,
            reference_number: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn decline() -> BookingEvent {
        BookingEvent::Decline {
            reason: "fully booked that week".to_string(),
        }
    }

    fn proof() -> BookingEvent {
        BookingEvent::SubmitPaymentProof {
            proof_ref: "uploads/proof-123.jpg".to_string(),
            reference_number: "REF-0042".to_string(),
        }
    }

    // ==================== transition table tests ====================

    #[test]
    fn test_provider_approves_pending() {
        assert_eq!(
            apply(BookingStatus::Pending, Actor::Provider, &BookingEvent::Approve),
            Ok(BookingStatus::Approved)
        );
    }

    #[test]
    fn test_provider_declines_pending() {
        assert_eq!(
            apply(BookingStatus::Pending, Actor::Provider, &decline()),
            Ok(BookingStatus::Declined)
        );
    }

    #[test]
    fn test_owner_cancels_pending_approved_and_paid() {
        for from in [
            BookingStatus::Pending,
            BookingStatus::Approved,
            BookingStatus::Paid,
        ] {
            assert_eq!(
                apply(from, Actor::Owner, &BookingEvent::Cancel),
                Ok(BookingStatus::Cancelled)
            );
        }
    }

    #[test]
    fn test_owner_cannot_cancel_under_verification() {
        // Once proof is submitted the provider owns the next move.
        let result = apply(
            BookingStatus::AwaitingVerification,
            Actor::Owner,
            &BookingEvent::Cancel,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_owner_submits_payment_proof() {
        assert_eq!(
            apply(BookingStatus::Approved, Actor::Owner, &proof()),
            Ok(BookingStatus::AwaitingVerification)
        );
    }

    #[test]
    fn test_provider_accepts_or_voids_payment() {
        assert_eq!(
            apply(
                BookingStatus::AwaitingVerification,
                Actor::Provider,
                &BookingEvent::AcceptPayment
            ),
            Ok(BookingStatus::Paid)
        );
        assert_eq!(
            apply(
                BookingStatus::AwaitingVerification,
                Actor::Provider,
                &BookingEvent::VoidPayment {
                    reason: "reference number does not match".to_string()
                }
            ),
            Ok(BookingStatus::Voided)
        );
    }

    #[test]
    fn test_declined_is_terminal() {
        let result = apply(BookingStatus::Declined, Actor::Provider, &BookingEvent::Approve);
        assert_eq!(
            result,
            Err(InvalidTransition {
                from: BookingStatus::Declined,
                actor: Actor::Provider,
                event: "approve",
            })
        );
    }

    #[test]
    fn test_terminal_states_reject_every_event() {
        let events = [
            BookingEvent::Approve,
            decline(),
            BookingEvent::Cancel,
            proof(),
            BookingEvent::AcceptPayment,
        ];
        for from in [
            BookingStatus::Declined,
            BookingStatus::Voided,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
        ] {
            for event in &events {
                for actor in [Actor::Owner, Actor::Provider] {
                    assert!(apply(from, actor, event).is_err());
                }
            }
        }
    }

    #[test]
    fn test_wrong_actor_is_rejected() {
        // Owners cannot approve their own booking.
        assert!(apply(BookingStatus::Pending, Actor::Owner, &BookingEvent::Approve).is_err());
        // Providers cannot submit the owner's payment proof.
        assert!(apply(BookingStatus::Approved, Actor::Provider, &proof()).is_err());
    }

    #[test]
    fn test_rejection_carries_state_and_event() {
        let err = apply(BookingStatus::Paid, Actor::Provider, &BookingEvent::Approve).unwrap_err();
        assert_eq!(err.from, BookingStatus::Paid);
        assert_eq!(err.event, "approve");
        assert!(err.to_string().contains("paid"));
    }

    // ==================== classify tests ====================

    #[test]
    fn test_paid_completes_four_hours_after_start() {
        let paid = booking(BookingStatus::Paid, "2025-01-10", "10:00");
        let just_before = "2025-01-10T13:59:00".parse().unwrap();
        let at_threshold = "2025-01-10T14:00:00".parse().unwrap();

        assert_eq!(classify(&paid, just_before), BookingStatus::Paid);
        assert_eq!(classify(&paid, at_threshold), BookingStatus::Completed);
    }

    #[test]
    fn test_classify_is_idempotent_before_threshold() {
        let paid = booking(BookingStatus::Paid, "2025-01-10", "10:00");
        for now in ["2025-01-10T10:30:00", "2025-01-10T12:00:00", "2025-01-10T13:59:59"] {
            assert_eq!(classify(&paid, now.parse().unwrap()), BookingStatus::Paid);
        }
    }

    #[test]
    fn test_classify_leaves_unpaid_statuses_alone() {
        let long_past = "2025-06-01T00:00:00".parse().unwrap();
        for status in [
            BookingStatus::Pending,
            BookingStatus::Approved,
            BookingStatus::AwaitingVerification,
            BookingStatus::Declined,
            BookingStatus::Cancelled,
        ] {
            let b = booking(status, "2025-01-10", "10:00");
            assert_eq!(classify(&b, long_past), status);
        }
    }

    // ==================== active-hold and reschedule tests ====================

    #[test]
    fn test_active_hold_set() {
        assert!(BookingStatus::Pending.is_active_hold());
        assert!(BookingStatus::Approved.is_active_hold());
        assert!(BookingStatus::AwaitingVerification.is_active_hold());
        assert!(BookingStatus::Paid.is_active_hold());
        assert!(!BookingStatus::Declined.is_active_hold());
        assert!(!BookingStatus::Cancelled.is_active_hold());
        assert!(!BookingStatus::Completed.is_active_hold());
        assert!(!BookingStatus::Voided.is_active_hold());
    }

    #[test]
    fn test_reschedulable_until_completed() {
        assert!(is_reschedulable(BookingStatus::Pending));
        assert!(is_reschedulable(BookingStatus::Paid));
        assert!(!is_reschedulable(BookingStatus::Completed));
        assert!(!is_reschedulable(BookingStatus::Declined));
    }

    #[test]
    fn test_reschedule_into_closed_day_changes_nothing() {
        let provider_id = Uuid::new_v4();
        // Open Mondays only.
        let hours = vec![OperatingHours {
            provider_id,
            day_of_week: Weekday::Mon,
            start_time: parse_time_slot("09:00").unwrap(),
            end_time: parse_time_slot("17:00").unwrap(),
        }];

        let b = booking(BookingStatus::Approved, "2025-01-06", "10:00");

        // 2025-01-12 is a Sunday; the target slot is rejected and the
        // booking keeps its original date, time, and status.
        let sunday = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap();
        let verdict = check_slot(
            sunday,
            parse_time_slot("10:00").unwrap(),
            &hours,
            &[],
            Some(b.id),
        );
        assert_eq!(verdict, SlotCheck::ClosedDay);
        assert_eq!(b.status, BookingStatus::Approved);
        assert_eq!(b.date, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
        assert_eq!(b.time_slot, parse_time_slot("10:00").unwrap());
    }

    // ==================== end-to-end scenario ====================

    #[test]
    fn test_full_booking_flow() {
        // Provider opens Mondays 09:00-17:00 and prices a medium dog groom.
        let provider_id = Uuid::new_v4();
        let hours = vec![OperatingHours {
            provider_id,
            day_of_week: Weekday::Mon,
            start_time: parse_time_slot("09:00").unwrap(),
            end_time: parse_time_slot("17:00").unwrap(),
        }];

        let candidate = OptionInput {
            pet_type: PetType::Dog,
            size_key: SizeKey::Medium,
            weight_range: Some(WeightRange::new(dec!(5), dec!(10))),
            price: dec!(600),
        };
        validate_option(&[], &candidate).unwrap();
        let options = vec![candidate.into_option(Uuid::new_v4())];

        // Owner resolves a price and picks a Monday morning slot.
        let price = resolve_price(&options, PetType::Dog, SizeKey::Medium).unwrap();
        assert_eq!(price, dec!(600));

        let monday = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let slot = parse_time_slot("10:00").unwrap();
        assert_eq!(check_slot(monday, slot, &hours, &[], None), SlotCheck::Available);

        // Booking starts pending and walks the happy path.
        let mut b = booking(BookingStatus::Pending, "2025-01-06", "10:00");
        b.price = price;

        b.status = apply(b.status, Actor::Provider, &BookingEvent::Approve).unwrap();
        assert_eq!(b.status, BookingStatus::Approved);

        b.status = apply(b.status, Actor::Owner, &proof()).unwrap();
        assert_eq!(b.status, BookingStatus::AwaitingVerification);

        b.status = apply(b.status, Actor::Provider, &BookingEvent::AcceptPayment).unwrap();
        assert_eq!(b.status, BookingStatus::Paid);

        // Four hours after the slot the booking reads as completed.
        let after = "2025-01-06T14:00:00".parse().unwrap();
        assert_eq!(classify(&b, after), BookingStatus::Completed);
    }
}
