//! Response DTOs for booking endpoints.
//!
//! Every response carries the effective status for "now", so time-derived
//! completion shows up on reads without ever being written to the store.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::catalog::models::{PetType, SizeKey};

use super::lifecycle;
use super::models::{Booking, BookingStatus};

/// Booking for JSON responses
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub owner_id: Uuid,
    pub service_id: Uuid,
    pub pricing_option_id: Uuid,
    pub pet_type: PetType,
    pub size_key: SizeKey,
    pub date: NaiveDate,
    pub time: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub status: BookingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_proof_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingResponse {
    /// Build a response with the status classified at `now`
    pub fn from_classified(booking: Booking, now: NaiveDateTime) -> Self {
        let status = lifecycle::classify(&booking, now);
        Self {
            id: booking.id,
            provider_id: booking.provider_id,
            owner_id: booking.owner_id,
            service_id: booking.service_id,
            pricing_option_id: booking.pricing_option_id,
            pet_type: booking.pet_type,
            size_key: booking.size_key,
            date: booking.date,
            time: booking.time_slot.format("%H:%M").to_string(),
            price: booking.price,
            status,
            rejection_reason: booking.rejection_reason,
            payment_proof_ref: booking.payment_proof_ref,
            reference_number: booking.reference_number,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

/// Response to an owner cancellation.
///
/// `non_refundable` is set when the booking was already paid, so the caller
/// can warn that the payment is kept.
#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub booking: BookingResponse,
    pub non_refundable: bool,
}

/// A list of bookings (owner history or provider dashboard)
#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    pub bookings: Vec<BookingResponse>,
}
