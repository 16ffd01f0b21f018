//! Booking models and lifecycle vocabulary.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use crate::catalog::models::{PetType, SizeKey};

/// Canonical booking status set.
///
/// The owner- and provider-facing screens historically used loosely-matching
/// labels for the payment-review stage; those are normalized to the single
/// `AwaitingVerification` state. `Completed` is derived from the clock at
/// read time and never stored (the schema's status check enforces this).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Approved,
    Declined,
    AwaitingVerification,
    Paid,
    Voided,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Declined => "declined",
            BookingStatus::AwaitingVerification => "awaiting_verification",
            BookingStatus::Paid => "paid",
            BookingStatus::Voided => "voided",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "approved" => Some(BookingStatus::Approved),
            "declined" => Some(BookingStatus::Declined),
            "awaiting_verification" => Some(BookingStatus::AwaitingVerification),
            "paid" => Some(BookingStatus::Paid),
            "voided" => Some(BookingStatus::Voided),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    /// Statuses that reserve the provider's time slot against new bookings
    pub fn is_active_hold(self) -> bool {
        matches!(
            self,
            BookingStatus::Pending
                | BookingStatus::Approved
                | BookingStatus::AwaitingVerification
                | BookingStatus::Paid
        )
    }

    /// No further events apply once a booking reaches these
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BookingStatus::Declined
                | BookingStatus::Voided
                | BookingStatus::Cancelled
                | BookingStatus::Completed
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is acting on a booking.
///
/// Identity resolution happens upstream; the engine only sees the role and
/// the already-resolved party id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Owner,
    Provider,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Owner => f.write_str("owner"),
            Actor::Provider => f.write_str("provider"),
        }
    }
}

/// An action that drives a booking through its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingEvent {
    Approve,
    Decline { reason: String },
    Cancel,
    SubmitPaymentProof {
        proof_ref: String,
        reference_number: String,
    },
    AcceptPayment,
    VoidPayment { reason: String },
}

impl BookingEvent {
    /// Stable event name for errors and logs
    pub fn name(&self) -> &'static str {
        match self {
            BookingEvent::Approve => "approve",
            BookingEvent::Decline { .. } => "decline",
            BookingEvent::Cancel => "cancel",
            BookingEvent::SubmitPaymentProof { .. } => "submit_payment_proof",
            BookingEvent::AcceptPayment => "accept_payment",
            BookingEvent::VoidPayment { .. } => "void_payment",
        }
    }
}

/// An appointment booking
#[derive(Debug, Clone)]
pub struct Booking {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub owner_id: Uuid,
    pub service_id: Uuid,
    pub pricing_option_id: Uuid,
    pub pet_type: PetType,
    pub size_key: SizeKey,
    pub date: NaiveDate,
    pub time_slot: NaiveTime,
    pub price: Decimal,
    pub status: BookingStatus,
    pub rejection_reason: Option<String>,
    pub payment_proof_ref: Option<String>,
    pub reference_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Booking row from database
#[derive(Debug, Clone, FromRow)]
pub struct BookingRow {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub owner_id: Uuid,
    pub service_id: Uuid,
    pub pricing_option_id: Uuid,
    pub pet_type: String,
    pub size_key: String,
    pub date: NaiveDate,
    pub time_slot: NaiveTime,
    pub price: Decimal,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub payment_proof_ref: Option<String>,
    pub reference_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingRow {
    pub fn parse(self) -> Option<Booking> {
        Some(Booking {
            id: self.id,
            provider_id: self.provider_id,
            owner_id: self.owner_id,
            service_id: self.service_id,
            pricing_option_id: self.pricing_option_id,
            pet_type: PetType::parse(&self.pet_type)?,
            size_key: SizeKey::parse(&self.size_key)?,
            date: self.date,
            time_slot: self.time_slot,
            price: self.price,
            status: BookingStatus::parse(&self.status)?,
            rejection_reason: self.rejection_reason,
            payment_proof_ref: self.payment_proof_ref,
            reference_number: self.reference_number,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
