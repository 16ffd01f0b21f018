//! Shared database queries: providers and operating hours

use chrono::{NaiveTime, Weekday};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{weekday_index, OperatingHoursRow, Provider};

/// Get a provider by id
pub async fn get_provider(pool: &PgPool, provider_id: Uuid) -> Result<Option<Provider>> {
    let provider = sqlx::query_as::<_, Provider>(
        r#"
        SELECT id, business_name, active
        FROM providers
        WHERE id = $1
          AND active = true
        "#,
    )
    .bind(provider_id)
    .fetch_optional(pool)
    .await?;

    Ok(provider)
}

/// All operating hours rows for a provider
pub async fn operating_hours_rows(
    pool: &PgPool,
    provider_id: Uuid,
) -> Result<Vec<OperatingHoursRow>> {
    let rows = sqlx::query_as::<_, OperatingHoursRow>(
        r#"
        SELECT provider_id, day_of_week, start_time, end_time
        FROM operating_hours
        WHERE provider_id = $1
        ORDER BY day_of_week, start_time
        "#,
    )
    .bind(provider_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Replace a provider's weekly hours in one transaction
pub async fn replace_operating_hours(
    pool: &PgPool,
    provider_id: Uuid,
    windows: &[(Weekday, NaiveTime, NaiveTime)],
) -> Result<()> {
    let mut tx = pool.begin().await.map_err(AppError::Database)?;

    sqlx::query(
        r#"
        DELETE FROM operating_hours WHERE provider_id = $1
        "#,
    )
    .bind(provider_id)
    .execute(&mut *tx)
    .await?;

    for (day, start, end) in windows {
        sqlx::query(
            r#"
            INSERT INTO operating_hours (provider_id, day_of_week, start_time, end_time)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(provider_id)
        .bind(weekday_index(*day))
        .bind(start)
        .bind(end)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await.map_err(AppError::Database)?;
    Ok(())
}
