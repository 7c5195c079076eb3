use async_trait::async_trait;
use chrono::Utc;
use pm_core::{Requirement, RequirementStatus, RequirementStore};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::RequirementRow;

const REQUIREMENT_COLUMNS: &str = r#"
    id, title, description, bucket_id, squad_id,
    revenue_estimate, cost_saving, client_count, client_boost, effort_man_days, cost_per_man_day,
    roi, sprint_estimate, priority, status, prd_id, test_case_ids, created_at, updated_at
"#;

#[derive(Clone)]
pub struct RequirementRepository {
    pool: SqlitePool,
}

impl RequirementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert, or overwrite every column of an existing row with the same id.
    /// An overwrite keeps the row's original insertion position.
    pub async fn upsert(&self, requirement: &Requirement) -> Result<Requirement, DbError> {
        let row = RequirementRow::from(requirement);

        sqlx::query(
            r#"
            INSERT INTO requirements (
                id, title, description, bucket_id, squad_id,
                revenue_estimate, cost_saving, client_count, client_boost, effort_man_days, cost_per_man_day,
                roi, sprint_estimate, priority, status, prd_id, test_case_ids, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                bucket_id = excluded.bucket_id,
                squad_id = excluded.squad_id,
                revenue_estimate = excluded.revenue_estimate,
                cost_saving = excluded.cost_saving,
                client_count = excluded.client_count,
                client_boost = excluded.client_boost,
                effort_man_days = excluded.effort_man_days,
                cost_per_man_day = excluded.cost_per_man_day,
                roi = excluded.roi,
                sprint_estimate = excluded.sprint_estimate,
                priority = excluded.priority,
                status = excluded.status,
                prd_id = excluded.prd_id,
                test_case_ids = excluded.test_case_ids,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&row.id)
        .bind(&row.title)
        .bind(&row.description)
        .bind(&row.bucket_id)
        .bind(&row.squad_id)
        .bind(row.revenue_estimate)
        .bind(row.cost_saving)
        .bind(row.client_count)
        .bind(row.client_boost)
        .bind(row.effort_man_days)
        .bind(row.cost_per_man_day)
        .bind(row.roi)
        .bind(row.sprint_estimate)
        .bind(row.priority)
        .bind(&row.status)
        .bind(&row.prd_id)
        .bind(&row.test_case_ids)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(requirement.clone())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Requirement>, DbError> {
        let row: Option<RequirementRow> = sqlx::query_as(&format!(
            "SELECT {REQUIREMENT_COLUMNS} FROM requirements WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_domain()))
    }

    /// All requirements in insertion order.
    pub async fn find_all(&self) -> Result<Vec<Requirement>, DbError> {
        let rows: Vec<RequirementRow> = sqlx::query_as(&format!(
            "SELECT {REQUIREMENT_COLUMNS} FROM requirements ORDER BY rowid ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_domain()).collect())
    }

    pub async fn update_priority(&self, id: Uuid, priority: i64) -> Result<bool, DbError> {
        let result = sqlx::query("UPDATE requirements SET priority = ?, updated_at = ? WHERE id = ?")
            .bind(priority)
            .bind(Utc::now().timestamp_millis())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: RequirementStatus,
    ) -> Result<Option<Requirement>, DbError> {
        let result = sqlx::query("UPDATE requirements SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(Utc::now().timestamp_millis())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    /// One statement, so concurrent appends all land.
    pub async fn append_test_cases(&self, id: Uuid, test_case_ids: &[Uuid]) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE requirements
            SET test_case_ids = (
                    SELECT json_group_array(value ORDER BY batch, key)
                    FROM (
                        SELECT 0 AS batch, key, value FROM json_each(requirements.test_case_ids)
                        UNION ALL
                        SELECT 1 AS batch, key, value FROM json_each(?)
                    )
                ),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(serde_json::to_string(test_case_ids)?)
        .bind(Utc::now().timestamp_millis())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::RequirementNotFound(id));
        }
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM requirements")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn prd_exists_for(&self, requirement_id: Uuid) -> Result<bool, DbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM prds WHERE requirement_id = ?")
            .bind(requirement_id.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }
}

#[async_trait]
impl RequirementStore for RequirementRepository {
    async fn find_all(&self) -> pm_core::Result<Vec<Requirement>> {
        Ok(RequirementRepository::find_all(self).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> pm_core::Result<Option<Requirement>> {
        Ok(RequirementRepository::find_by_id(self, id).await?)
    }

    async fn save(&self, requirement: &Requirement) -> pm_core::Result<Requirement> {
        Ok(self.upsert(requirement).await?)
    }

    async fn update_priority(&self, id: Uuid, priority: i64) -> pm_core::Result<bool> {
        Ok(RequirementRepository::update_priority(self, id, priority).await?)
    }

    async fn exists_prd_for(&self, requirement_id: Uuid) -> pm_core::Result<bool> {
        Ok(self.prd_exists_for(requirement_id).await?)
    }
}
