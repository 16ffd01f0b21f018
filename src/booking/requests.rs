//! Request DTOs for booking endpoints.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::catalog::models::{PetType, SizeKey};

use super::models::Actor;

/// Request to create a booking
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub provider_id: Uuid,
    pub owner_id: Uuid,
    pub service_id: Uuid,
    pub pet_type: PetType,
    pub size_key: SizeKey,
    pub date: NaiveDate,
    pub time: String,
}

/// Provider approves a pending booking
#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub provider_id: Uuid,
}

/// Provider declines a pending booking (reason mandatory)
#[derive(Debug, Deserialize)]
pub struct DeclineRequest {
    pub provider_id: Uuid,
    pub reason: String,
}

/// Owner cancels a booking
#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub owner_id: Uuid,
}

/// Owner submits the payment proof upload reference and payment reference
/// number (the upload itself happens against the file store)
#[derive(Debug, Deserialize)]
pub struct PaymentProofRequest {
    pub owner_id: Uuid,
    pub proof_ref: String,
    pub reference_number: String,
}

/// Provider accepts the submitted payment
#[derive(Debug, Deserialize)]
pub struct AcceptPaymentRequest {
    pub provider_id: Uuid,
}

/// Provider voids the submitted payment (reason mandatory)
#[derive(Debug, Deserialize)]
pub struct VoidPaymentRequest {
    pub provider_id: Uuid,
    pub reason: String,
}

/// Owner or provider moves a booking to a new slot
#[derive(Debug, Deserialize)]
pub struct RescheduleRequest {
    pub actor: Actor,
    pub actor_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
}

/// Status filter for the provider dashboard
#[derive(Debug, Deserialize)]
pub struct ProviderListQuery {
    #[serde(default)]
    pub status: Option<String>,
}
