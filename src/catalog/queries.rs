//! Database queries for the pricing catalog.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::AppError;

use super::models::{PricingOptionRow, ServiceRow};

/// Get a service by id
pub async fn get_service(pool: &PgPool, service_id: Uuid) -> Result<Option<ServiceRow>, AppError> {
    let row = sqlx::query_as::<_, ServiceRow>(
        r#"
        SELECT id, provider_id, kind, name, description, notes, created_at
        FROM services
        WHERE id = $1
        "#,
    )
    .bind(service_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Get all services for a provider, newest first
pub async fn get_provider_services(
    pool: &PgPool,
    provider_id: Uuid,
) -> Result<Vec<ServiceRow>, AppError> {
    let rows = sqlx::query_as::<_, ServiceRow>(
        r#"
        SELECT id, provider_id, kind, name, description, notes, created_at
        FROM services
        WHERE provider_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(provider_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Insert a service
pub async fn insert_service(
    pool: &PgPool,
    id: Uuid,
    provider_id: Uuid,
    kind: &str,
    name: &str,
    description: &str,
    notes: &str,
) -> Result<ServiceRow, AppError> {
    let row = sqlx::query_as::<_, ServiceRow>(
        r#"
        INSERT INTO services (id, provider_id, kind, name, description, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, provider_id, kind, name, description, notes, created_at
        "#,
    )
    .bind(id)
    .bind(provider_id)
    .bind(kind)
    .bind(name)
    .bind(description)
    .bind(notes)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Update a service's editable fields
pub async fn update_service(
    pool: &PgPool,
    service_id: Uuid,
    kind: &str,
    name: &str,
    description: &str,
    notes: &str,
) -> Result<Option<ServiceRow>, AppError> {
    let row = sqlx::query_as::<_, ServiceRow>(
        r#"
        UPDATE services
        SET kind = $2, name = $3, description = $4, notes = $5
        WHERE id = $1
        RETURNING id, provider_id, kind, name, description, notes, created_at
        "#,
    )
    .bind(service_id)
    .bind(kind)
    .bind(name)
    .bind(description)
    .bind(notes)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Delete a service (pricing options cascade)
pub async fn delete_service(pool: &PgPool, service_id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        DELETE FROM services WHERE id = $1
        "#,
    )
    .bind(service_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Get all pricing options for a service
pub async fn get_service_options(
    pool: &PgPool,
    service_id: Uuid,
) -> Result<Vec<PricingOptionRow>, AppError> {
    let rows = sqlx::query_as::<_, PricingOptionRow>(
        r#"
        SELECT id, service_id, pet_type, size_key, weight_min, weight_max, price
        FROM pricing_options
        WHERE service_id = $1
        ORDER BY pet_type, size_key
        "#,
    )
    .bind(service_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Insert a pricing option
pub async fn insert_option(
    pool: &PgPool,
    id: Uuid,
    service_id: Uuid,
    pet_type: &str,
    size_key: &str,
    weight_min: Option<Decimal>,
    weight_max: Option<Decimal>,
    price: Decimal,
) -> Result<PricingOptionRow, AppError> {
    let row = sqlx::query_as::<_, PricingOptionRow>(
        r#"
        INSERT INTO pricing_options (id, service_id, pet_type, size_key, weight_min, weight_max, price)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, service_id, pet_type, size_key, weight_min, weight_max, price
        "#,
    )
    .bind(id)
    .bind(service_id)
    .bind(pet_type)
    .bind(size_key)
    .bind(weight_min)
    .bind(weight_max)
    .bind(price)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Delete a pricing option, returning its service id if it existed
pub async fn delete_option(pool: &PgPool, option_id: Uuid) -> Result<Option<Uuid>, AppError> {
    let service_id: Option<Uuid> = sqlx::query_scalar(
        r#"
        DELETE FROM pricing_options WHERE id = $1
        RETURNING service_id
        "#,
    )
    .bind(option_id)
    .fetch_optional(pool)
    .await?;

    Ok(service_id)
}

/// Insert a service inside an open transaction (used by catalog submission)
pub async fn insert_service_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    provider_id: Uuid,
    kind: &str,
    name: &str,
    description: &str,
    notes: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO services (id, provider_id, kind, name, description, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(id)
    .bind(provider_id)
    .bind(kind)
    .bind(name)
    .bind(description)
    .bind(notes)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Insert a pricing option inside an open transaction
pub async fn insert_option_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    service_id: Uuid,
    pet_type: &str,
    size_key: &str,
    weight_min: Option<Decimal>,
    weight_max: Option<Decimal>,
    price: Decimal,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO pricing_options (id, service_id, pet_type, size_key, weight_min, weight_max, price)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(id)
    .bind(service_id)
    .bind(pet_type)
    .bind(size_key)
    .bind(weight_min)
    .bind(weight_max)
    .bind(price)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
