use chrono::Utc;
use pm_core::Prd;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::PrdRow;

const PRD_COLUMNS: &str = r#"
    id, requirement_id, title, overview, user_stories, ui_design, backend_logic,
    diagrams, solution_delta, delta_prototypes, generated_by_provider, generated_by_model, created_at
"#;

#[derive(Clone)]
pub struct PrdRepository {
    pool: SqlitePool,
}

impl PrdRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert the PRD and point its requirement at it, in one transaction.
    pub async fn create(&self, prd: &Prd) -> Result<Prd, DbError> {
        let row = PrdRow::try_from(prd)?;
        let mut tx = self.pool.begin().await?;

        let linked = sqlx::query("UPDATE requirements SET prd_id = ?, updated_at = ? WHERE id = ?")
            .bind(&row.id)
            .bind(Utc::now().timestamp_millis())
            .bind(&row.requirement_id)
            .execute(&mut *tx)
            .await?;
        if linked.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(DbError::RequirementNotFound(prd.requirement_id));
        }

        sqlx::query(
            r#"
            INSERT INTO prds (
                id, requirement_id, title, overview, user_stories, ui_design, backend_logic,
                diagrams, solution_delta, delta_prototypes, generated_by_provider, generated_by_model, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(&row.requirement_id)
        .bind(&row.title)
        .bind(&row.overview)
        .bind(&row.user_stories)
        .bind(&row.ui_design)
        .bind(&row.backend_logic)
        .bind(&row.diagrams)
        .bind(&row.solution_delta)
        .bind(&row.delta_prototypes)
        .bind(&row.generated_by_provider)
        .bind(&row.generated_by_model)
        .bind(row.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(prd.clone())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Prd>, DbError> {
        let row: Option<PrdRow> =
            sqlx::query_as(&format!("SELECT {PRD_COLUMNS} FROM prds WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|r| r.into_domain()))
    }

    pub async fn find_by_requirement(&self, requirement_id: Uuid) -> Result<Option<Prd>, DbError> {
        let row: Option<PrdRow> = sqlx::query_as(&format!(
            "SELECT {PRD_COLUMNS} FROM prds WHERE requirement_id = ? ORDER BY rowid ASC LIMIT 1"
        ))
        .bind(requirement_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_domain()))
    }

    pub async fn find_all(&self) -> Result<Vec<Prd>, DbError> {
        let rows: Vec<PrdRow> = sqlx::query_as(&format!(
            "SELECT {PRD_COLUMNS} FROM prds ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_domain()).collect())
    }
}
