//! Catalog service functions with database access.
//!
//! Validation always runs against the service's current option set before
//! anything is persisted; a rejected write leaves the catalog untouched.

use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::cache::AppCache;
use crate::error::AppError;

use super::draft::CatalogSubmission;
use super::models::{OptionInput, PetType, PricingOption, Service, ServiceKind, SizeKey};
use super::queries;
use super::rules;

/// A service together with its pricing options
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub service: Service,
    pub options: Vec<PricingOption>,
}

fn parse_service(row: super::models::ServiceRow) -> Result<Service, AppError> {
    row.parse()
        .ok_or_else(|| AppError::Internal("corrupt service row".to_string()))
}

fn parse_options(rows: Vec<super::models::PricingOptionRow>) -> Result<Vec<PricingOption>, AppError> {
    rows.into_iter()
        .map(|row| {
            row.parse()
                .ok_or_else(|| AppError::Internal("corrupt pricing option row".to_string()))
        })
        .collect()
}

/// Get a service or fail with NotFound
pub async fn get_service(pool: &PgPool, service_id: Uuid) -> Result<Service, AppError> {
    let row = queries::get_service(pool, service_id)
        .await?
        .ok_or(AppError::NotFound)?;
    parse_service(row)
}

/// Get a service's options, through the cache
pub async fn service_options(
    pool: &PgPool,
    cache: &AppCache,
    service_id: Uuid,
) -> Result<Arc<Vec<PricingOption>>, AppError> {
    if let Some(cached) = cache.options.get(&service_id).await {
        return Ok(cached);
    }
    let options = parse_options(queries::get_service_options(pool, service_id).await?)?;
    let options = Arc::new(options);
    cache.options.insert(service_id, options.clone()).await;
    Ok(options)
}

/// Create a service for a provider
pub async fn create_service(
    pool: &PgPool,
    provider_id: Uuid,
    kind: ServiceKind,
    name: &str,
    description: &str,
    notes: &str,
) -> Result<Service, AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("service name is required".to_string()));
    }
    crate::db::queries::get_provider(pool, provider_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let row = queries::insert_service(
        pool,
        Uuid::new_v4(),
        provider_id,
        kind.as_str(),
        name,
        description,
        notes,
    )
    .await?;
    info!("Created service {} for provider {}", row.id, provider_id);
    parse_service(row)
}

/// Update a service's editable fields
pub async fn update_service(
    pool: &PgPool,
    service_id: Uuid,
    kind: ServiceKind,
    name: &str,
    description: &str,
    notes: &str,
) -> Result<Service, AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("service name is required".to_string()));
    }
    let row = queries::update_service(pool, service_id, kind.as_str(), name, description, notes)
        .await?
        .ok_or(AppError::NotFound)?;
    parse_service(row)
}

/// Delete a service and its options.
///
/// A service that already has bookings is protected by a foreign key; that
/// surfaces as a validation error rather than a bare store error.
pub async fn delete_service(
    pool: &PgPool,
    cache: &AppCache,
    service_id: Uuid,
) -> Result<(), AppError> {
    let deleted = queries::delete_service(pool, service_id)
        .await
        .map_err(|err| match err {
            AppError::Database(sqlx::Error::Database(ref db)) if db.is_foreign_key_violation() => {
                AppError::Validation(
                    "service has bookings and can no longer be deleted".to_string(),
                )
            }
            other => other,
        })?;
    if !deleted {
        return Err(AppError::NotFound);
    }
    cache.invalidate_service_options(service_id).await;
    Ok(())
}

/// Validate and persist a pricing option for a service.
///
/// The full rule set runs against the current option set first; nothing is
/// written unless validation passes.
pub async fn add_option(
    pool: &PgPool,
    cache: &AppCache,
    service_id: Uuid,
    input: OptionInput,
) -> Result<PricingOption, AppError> {
    get_service(pool, service_id).await?;
    // Re-read the live rows; the validator never trusts what the UI offered.
    let existing = parse_options(queries::get_service_options(pool, service_id).await?)?;
    rules::validate_option(&existing, &input)?;

    let row = queries::insert_option(
        pool,
        Uuid::new_v4(),
        service_id,
        input.pet_type.as_str(),
        input.size_key.as_str(),
        input.weight_range.map(|r| r.min),
        input.weight_range.map(|r| r.max),
        input.price,
    )
    .await?;
    cache.invalidate_service_options(service_id).await;

    row.parse()
        .ok_or_else(|| AppError::Internal("corrupt pricing option row".to_string()))
}

/// Remove a pricing option
pub async fn remove_option(
    pool: &PgPool,
    cache: &AppCache,
    option_id: Uuid,
) -> Result<(), AppError> {
    let service_id = queries::delete_option(pool, option_id)
        .await
        .map_err(|err| match err {
            AppError::Database(sqlx::Error::Database(ref db)) if db.is_foreign_key_violation() => {
                AppError::Validation(
                    "pricing option has bookings and can no longer be deleted".to_string(),
                )
            }
            other => other,
        })?
        .ok_or(AppError::NotFound)?;
    cache.invalidate_service_options(service_id).await;
    Ok(())
}

/// Full catalog for a provider: every service with its options
pub async fn list_catalog(pool: &PgPool, provider_id: Uuid) -> Result<Vec<CatalogEntry>, AppError> {
    let service_rows = queries::get_provider_services(pool, provider_id).await?;
    let mut entries = Vec::with_capacity(service_rows.len());
    for row in service_rows {
        let service = parse_service(row)?;
        let options = parse_options(queries::get_service_options(pool, service.id).await?)?;
        entries.push(CatalogEntry { service, options });
    }
    Ok(entries)
}

/// Resolve the concrete price and option for a pet-type/size request
pub async fn resolve_service_price(
    pool: &PgPool,
    cache: &AppCache,
    service_id: Uuid,
    pet_type: PetType,
    size_key: SizeKey,
) -> Result<(Uuid, Decimal), AppError> {
    get_service(pool, service_id).await?;
    let options = service_options(pool, cache, service_id).await?;
    let option = rules::resolve_option(&options, pet_type, size_key)?;
    Ok((option.id, option.price))
}

/// Sizes still available for this pet type on a service (UI hinting)
pub async fn remaining_sizes(
    pool: &PgPool,
    cache: &AppCache,
    service_id: Uuid,
    pet_type: PetType,
) -> Result<Vec<SizeKey>, AppError> {
    get_service(pool, service_id).await?;
    let options = service_options(pool, cache, service_id).await?;
    Ok(rules::remaining_sizes(&options, pet_type))
}

/// Persist a sealed catalog submission in one transaction
pub async fn submit_catalog(
    pool: &PgPool,
    submission: CatalogSubmission,
) -> Result<Vec<Uuid>, AppError> {
    crate::db::queries::get_provider(pool, submission.provider_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut tx = pool.begin().await?;
    let mut service_ids = Vec::with_capacity(submission.services.len());
    for service in &submission.services {
        queries::insert_service_tx(
            &mut tx,
            service.id,
            submission.provider_id,
            service.kind.as_str(),
            &service.name,
            &service.description,
            &service.notes,
        )
        .await?;
        for option in &service.options {
            queries::insert_option_tx(
                &mut tx,
                option.id,
                option.service_id,
                option.pet_type.as_str(),
                option.size_key.as_str(),
                option.weight_range.map(|r| r.min),
                option.weight_range.map(|r| r.max),
                option.price,
            )
            .await?;
        }
        service_ids.push(service.id);
    }
    tx.commit().await?;

    info!(
        "Submitted catalog with {} services for provider {}",
        service_ids.len(),
        submission.provider_id
    );
    Ok(service_ids)
}
