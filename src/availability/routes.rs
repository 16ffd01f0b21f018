//! Availability route handlers

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::Weekday;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::AppState;

use super::engine::parse_time_slot;
use super::requests::{CheckSlotQuery, SetHoursRequest};
use super::responses::{HoursWindowResponse, ProviderHoursResponse, SlotCheckResponse};
use super::services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/providers/:provider_id/hours",
            get(get_hours).put(set_hours),
        )
        .route("/providers/:provider_id/check", get(check_slot))
}

/// A provider's weekly operating hours
async fn get_hours(
    State(state): State<AppState>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<ProviderHoursResponse>> {
    let hours = services::provider_hours(&state.db, &state.cache, provider_id).await?;
    Ok(Json(ProviderHoursResponse {
        provider_id,
        windows: hours.iter().map(HoursWindowResponse::from).collect(),
    }))
}

/// Replace a provider's weekly operating hours
async fn set_hours(
    State(state): State<AppState>,
    Path(provider_id): Path<Uuid>,
    Json(req): Json<SetHoursRequest>,
) -> Result<Json<ProviderHoursResponse>> {
    let mut windows = Vec::with_capacity(req.windows.len());
    for window in &req.windows {
        let day: Weekday = window
            .day
            .parse()
            .map_err(|_| AppError::Validation(format!("unknown weekday: {}", window.day)))?;
        let start = parse_time_slot(&window.start)
            .ok_or_else(|| AppError::Validation(format!("invalid time: {}", window.start)))?;
        let end = parse_time_slot(&window.end)
            .ok_or_else(|| AppError::Validation(format!("invalid time: {}", window.end)))?;
        windows.push((day, start, end));
    }

    let hours = services::set_provider_hours(&state.db, &state.cache, provider_id, windows).await?;
    Ok(Json(ProviderHoursResponse {
        provider_id,
        windows: hours.iter().map(HoursWindowResponse::from).collect(),
    }))
}

/// Advisory slot check for the booking UI
async fn check_slot(
    State(state): State<AppState>,
    Path(provider_id): Path<Uuid>,
    Query(query): Query<CheckSlotQuery>,
) -> Result<Json<SlotCheckResponse>> {
    let time_slot = parse_time_slot(&query.time)
        .ok_or_else(|| AppError::Validation(format!("invalid time: {}", query.time)))?;
    let verdict = services::check_provider_slot(
        &state.db,
        &state.cache,
        provider_id,
        query.date,
        time_slot,
        query.exclude_booking_id,
    )
    .await?;
    Ok(Json(verdict.into()))
}
