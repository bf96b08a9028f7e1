use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::hazards::models::{CreateHazardReport, HazardReport};
use crate::shared::constants::STATUS_REPORTED;

/// Append-only collection of hazard reports
#[async_trait]
pub trait HazardStore: Send + Sync {
    /// Insert a report; the store assigns `status` and `created_at`
    async fn insert(&self, data: &CreateHazardReport) -> Result<HazardReport>;

    /// All reports, newest first
    async fn list_recent(&self) -> Result<Vec<HazardReport>>;
}

/// PostgreSQL-backed store over the `hazards` table
pub struct PgHazardStore {
    pool: PgPool,
}

impl PgHazardStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HazardStore for PgHazardStore {
    async fn insert(&self, data: &CreateHazardReport) -> Result<HazardReport> {
        let report = sqlx::query_as::<_, HazardReport>(
            r#"
            INSERT INTO hazards (id, hazard_type, location, severity, description, image_url, image_key, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, hazard_type, location, severity, description, image_url, image_key, status, created_at
            "#,
        )
        .bind(data.id)
        .bind(&data.hazard_type)
        .bind(&data.location)
        .bind(&data.severity)
        .bind(&data.description)
        .bind(&data.image_url)
        .bind(&data.image_key)
        .bind(STATUS_REPORTED)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert hazard report: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(report)
    }

    async fn list_recent(&self) -> Result<Vec<HazardReport>> {
        let reports = sqlx::query_as::<_, HazardReport>(
            r#"
            SELECT id, hazard_type, location, severity, description, image_url, image_key, status, created_at
            FROM hazards
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list hazard reports: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(reports)
    }
}
