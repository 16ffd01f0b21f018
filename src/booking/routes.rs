//! Booking route handlers

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use uuid::Uuid;

use crate::availability::parse_time_slot;
use crate::error::{AppError, Result};
use crate::AppState;

use super::models::{Actor, BookingEvent, BookingStatus};
use super::requests::{
    AcceptPaymentRequest, ApproveRequest, CancelRequest, CreateBookingRequest, DeclineRequest,
    PaymentProofRequest, ProviderListQuery, RescheduleRequest, VoidPaymentRequest,
};
use super::responses::{BookingListResponse, BookingResponse, CancelResponse};
use super::services::{self, NewBooking};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/:id", get(get_booking))
        .route("/:id/approve", post(approve))
        .route("/:id/decline", post(decline))
        .route("/:id/cancel", post(cancel))
        .route("/:id/payment-proof", post(submit_payment_proof))
        .route("/:id/accept-payment", post(accept_payment))
        .route("/:id/void", post(void_payment))
        .route("/:id/reschedule", post(reschedule))
        .route("/owner/:owner_id", get(owner_bookings))
        .route("/provider/:provider_id", get(provider_bookings))
}

/// Create a booking in the pending state
async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>> {
    let time_slot = parse_time_slot(&req.time)
        .ok_or_else(|| AppError::Validation(format!("invalid time: {}", req.time)))?;
    let booking = services::create_booking(
        &state.db,
        &state.cache,
        NewBooking {
            provider_id: req.provider_id,
            owner_id: req.owner_id,
            service_id: req.service_id,
            pet_type: req.pet_type,
            size_key: req.size_key,
            date: req.date,
            time_slot,
        },
    )
    .await?;
    Ok(Json(BookingResponse::from_classified(
        booking,
        Utc::now().naive_utc(),
    )))
}

/// A booking with its effective status
async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>> {
    let booking = services::get_booking(&state.db, booking_id).await?;
    Ok(Json(BookingResponse::from_classified(
        booking,
        Utc::now().naive_utc(),
    )))
}

/// Provider approves a pending booking
async fn approve(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<ApproveRequest>,
) -> Result<Json<BookingResponse>> {
    let outcome = services::transition(
        &state.db,
        booking_id,
        Actor::Provider,
        req.provider_id,
        BookingEvent::Approve,
    )
    .await?;
    Ok(Json(BookingResponse::from_classified(
        outcome.booking,
        Utc::now().naive_utc(),
    )))
}

/// Provider declines a pending booking
async fn decline(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<DeclineRequest>,
) -> Result<Json<BookingResponse>> {
    let outcome = services::transition(
        &state.db,
        booking_id,
        Actor::Provider,
        req.provider_id,
        BookingEvent::Decline { reason: req.reason },
    )
    .await?;
    Ok(Json(BookingResponse::from_classified(
        outcome.booking,
        Utc::now().naive_utc(),
    )))
}

/// Owner cancels a booking
async fn cancel(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<CancelRequest>,
) -> Result<Json<CancelResponse>> {
    let outcome = services::transition(
        &state.db,
        booking_id,
        Actor::Owner,
        req.owner_id,
        BookingEvent::Cancel,
    )
    .await?;
    let non_refundable = outcome.from == BookingStatus::Paid;
    Ok(Json(CancelResponse {
        booking: BookingResponse::from_classified(outcome.booking, Utc::now().naive_utc()),
        non_refundable,
    }))
}

/// Owner submits payment proof and reference number
async fn submit_payment_proof(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<PaymentProofRequest>,
) -> Result<Json<BookingResponse>> {
    let outcome = services::transition(
        &state.db,
        booking_id,
        Actor::Owner,
        req.owner_id,
        BookingEvent::SubmitPaymentProof {
            proof_ref: req.proof_ref,
            reference_number: req.reference_number,
        },
    )
    .await?;
    Ok(Json(BookingResponse::from_classified(
        outcome.booking,
        Utc::now().naive_utc(),
    )))
}

/// Provider accepts the submitted payment
async fn accept_payment(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<AcceptPaymentRequest>,
) -> Result<Json<BookingResponse>> {
    let outcome = services::transition(
        &state.db,
        booking_id,
        Actor::Provider,
        req.provider_id,
        BookingEvent::AcceptPayment,
    )
    .await?;
    Ok(Json(BookingResponse::from_classified(
        outcome.booking,
        Utc::now().naive_utc(),
    )))
}

/// Provider voids the submitted payment
async fn void_payment(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<VoidPaymentRequest>,
) -> Result<Json<BookingResponse>> {
    let outcome = services::transition(
        &state.db,
        booking_id,
        Actor::Provider,
        req.provider_id,
        BookingEvent::VoidPayment { reason: req.reason },
    )
    .await?;
    Ok(Json(BookingResponse::from_classified(
        outcome.booking,
        Utc::now().naive_utc(),
    )))
}

/// Move a booking to a new slot
async fn reschedule(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<RescheduleRequest>,
) -> Result<Json<BookingResponse>> {
    let time_slot = parse_time_slot(&req.time)
        .ok_or_else(|| AppError::Validation(format!("invalid time: {}", req.time)))?;
    let booking = services::reschedule(
        &state.db,
        &state.cache,
        booking_id,
        req.actor,
        req.actor_id,
        req.date,
        time_slot,
    )
    .await?;
    Ok(Json(BookingResponse::from_classified(
        booking,
        Utc::now().naive_utc(),
    )))
}

/// An owner's booking history
async fn owner_bookings(
    State(state): State<AppState>,
    Path(owner_id): Path<Uuid>,
) -> Result<Json<BookingListResponse>> {
    let now = Utc::now().naive_utc();
    let bookings = services::list_for_owner(&state.db, owner_id).await?;
    Ok(Json(BookingListResponse {
        bookings: bookings
            .into_iter()
            .map(|b| BookingResponse::from_classified(b, now))
            .collect(),
    }))
}

/// The provider review dashboard, optionally filtered by effective status
async fn provider_bookings(
    State(state): State<AppState>,
    Path(provider_id): Path<Uuid>,
    Query(query): Query<ProviderListQuery>,
) -> Result<Json<BookingListResponse>> {
    let status = match query.status.as_deref() {
        Some(raw) => Some(
            BookingStatus::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("unknown status: {}", raw)))?,
        ),
        None => None,
    };
    let now = Utc::now().naive_utc();
    let bookings = services::list_for_provider(&state.db, provider_id, status).await?;
    Ok(Json(BookingListResponse {
        bookings: bookings
            .into_iter()
            .map(|b| BookingResponse::from_classified(b, now))
            .collect(),
    }))
}
