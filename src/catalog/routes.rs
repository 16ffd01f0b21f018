//! Catalog route handlers

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::error::Result;
use crate::AppState;

use super::draft::CatalogDraft;
use super::requests::{
    AddOptionRequest, CreateServiceRequest, ResolvePriceQuery, SizeHintQuery, SubmitCatalogRequest,
    UpdateServiceRequest,
};
use super::responses::{
    CatalogEntryResponse, CatalogResponse, PriceResolutionResponse, PricingOptionResponse,
    ServiceResponse, SizeHintResponse, SubmitCatalogResponse,
};
use super::services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/services", post(create_service))
        .route("/services/:id", put(update_service).delete(delete_service))
        .route("/services/:id/options", post(add_option))
        .route("/services/:id/price", get(resolve_price))
        .route("/services/:id/sizes", get(size_hints))
        .route("/options/:id", delete(remove_option))
        .route("/providers/:provider_id", get(provider_catalog))
        .route("/submit", post(submit_catalog))
}

/// Create a single service
async fn create_service(
    State(state): State<AppState>,
    Json(req): Json<CreateServiceRequest>,
) -> Result<Json<ServiceResponse>> {
    let service = services::create_service(
        &state.db,
        req.provider_id,
        req.kind,
        &req.name,
        &req.description,
        &req.notes,
    )
    .await?;
    Ok(Json(service.into()))
}

/// Update a service
async fn update_service(
    State(state): State<AppState>,
    Path(service_id): Path<Uuid>,
    Json(req): Json<UpdateServiceRequest>,
) -> Result<Json<ServiceResponse>> {
    let service = services::update_service(
        &state.db,
        service_id,
        req.kind,
        &req.name,
        &req.description,
        &req.notes,
    )
    .await?;
    Ok(Json(service.into()))
}

/// Delete a service and its options
async fn delete_service(
    State(state): State<AppState>,
    Path(service_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    services::delete_service(&state.db, &state.cache, service_id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Validate and add a pricing option
async fn add_option(
    State(state): State<AppState>,
    Path(service_id): Path<Uuid>,
    Json(req): Json<AddOptionRequest>,
) -> Result<Json<PricingOptionResponse>> {
    let input = req.into_input()?;
    let option = services::add_option(&state.db, &state.cache, service_id, input).await?;
    Ok(Json(option.into()))
}

/// Remove a pricing option
async fn remove_option(
    State(state): State<AppState>,
    Path(option_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    services::remove_option(&state.db, &state.cache, option_id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Resolve a concrete price for a pet-type/size request
async fn resolve_price(
    State(state): State<AppState>,
    Path(service_id): Path<Uuid>,
    Query(query): Query<ResolvePriceQuery>,
) -> Result<Json<PriceResolutionResponse>> {
    let (pricing_option_id, price) = services::resolve_service_price(
        &state.db,
        &state.cache,
        service_id,
        query.pet_type,
        query.size_key,
    )
    .await?;
    Ok(Json(PriceResolutionResponse {
        service_id,
        pricing_option_id,
        pet_type: query.pet_type,
        size_key: query.size_key,
        price,
    }))
}

/// Sizes the validator would still accept (dropdown hinting)
async fn size_hints(
    State(state): State<AppState>,
    Path(service_id): Path<Uuid>,
    Query(query): Query<SizeHintQuery>,
) -> Result<Json<SizeHintResponse>> {
    let sizes =
        services::remaining_sizes(&state.db, &state.cache, service_id, query.pet_type).await?;
    Ok(Json(SizeHintResponse {
        service_id,
        pet_type: query.pet_type,
        sizes,
    }))
}

/// Full catalog for a provider
async fn provider_catalog(
    State(state): State<AppState>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<CatalogResponse>> {
    let entries = services::list_catalog(&state.db, provider_id).await?;
    Ok(Json(CatalogResponse {
        provider_id,
        services: entries.into_iter().map(CatalogEntryResponse::from).collect(),
    }))
}

/// Assemble a draft from the submitted payload and persist it atomically.
///
/// The draft re-validates every option as it is added, so an invalid payload
/// is rejected before any row is written.
async fn submit_catalog(
    State(state): State<AppState>,
    Json(req): Json<SubmitCatalogRequest>,
) -> Result<Json<SubmitCatalogResponse>> {
    let mut draft = CatalogDraft::new(req.provider_id);
    for service in req.services {
        let index = draft.add_service(service.kind, service.name, service.description, service.notes);
        for option in service.options {
            let input = option.into_input()?;
            draft.add_option(index, input)?;
        }
    }
    let submission = draft.submit()?;

    let provider_id = submission.provider_id;
    let service_ids = services::submit_catalog(&state.db, submission).await?;
    Ok(Json(SubmitCatalogResponse {
        provider_id,
        service_ids,
    }))
}
