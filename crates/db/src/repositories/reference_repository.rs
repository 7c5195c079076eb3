use pm_core::{Bucket, Squad};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{BucketRow, SquadRow};

#[derive(Clone)]
pub struct BucketRepository {
    pool: SqlitePool,
}

impl BucketRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, bucket: &Bucket) -> Result<Bucket, DbError> {
        let row = BucketRow::from(bucket);

        sqlx::query(
            r#"
            INSERT INTO buckets (id, name, description, color, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(&row.name)
        .bind(&row.description)
        .bind(&row.color)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;

        Ok(bucket.clone())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Bucket>, DbError> {
        let row: Option<BucketRow> = sqlx::query_as(
            "SELECT id, name, description, color, created_at FROM buckets WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_domain()).transpose()
    }

    pub async fn find_all(&self) -> Result<Vec<Bucket>, DbError> {
        let rows: Vec<BucketRow> = sqlx::query_as(
            "SELECT id, name, description, color, created_at FROM buckets ORDER BY rowid ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_domain()).collect()
    }

    pub async fn count(&self) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM buckets")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[derive(Clone)]
pub struct SquadRepository {
    pool: SqlitePool,
}

impl SquadRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, squad: &Squad) -> Result<Squad, DbError> {
        let row = SquadRow::from(squad);

        sqlx::query(
            r#"
            INSERT INTO squads (id, name, description, capacity, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(&row.name)
        .bind(&row.description)
        .bind(row.capacity)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;

        Ok(squad.clone())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Squad>, DbError> {
        let row: Option<SquadRow> = sqlx::query_as(
            "SELECT id, name, description, capacity, created_at FROM squads WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_domain()))
    }

    pub async fn find_all(&self) -> Result<Vec<Squad>, DbError> {
        let rows: Vec<SquadRow> = sqlx::query_as(
            "SELECT id, name, description, capacity, created_at FROM squads ORDER BY rowid ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_domain()).collect())
    }

    pub async fn count(&self) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM squads")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
