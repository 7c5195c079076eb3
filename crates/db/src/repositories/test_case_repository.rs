use pm_core::TestCase;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::TestCaseRow;

#[derive(Clone)]
pub struct TestCaseRepository {
    pool: SqlitePool,
}

impl TestCaseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a batch in the given order. Rows written before a failure stay
    /// written.
    pub async fn create_many(&self, test_cases: &[TestCase]) -> Result<Vec<TestCase>, DbError> {
        for test_case in test_cases {
            let row = TestCaseRow::try_from(test_case)?;

            sqlx::query(
                r#"
                INSERT INTO test_cases (id, requirement_id, title, description, preconditions, steps, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&row.id)
            .bind(&row.requirement_id)
            .bind(&row.title)
            .bind(&row.description)
            .bind(&row.preconditions)
            .bind(&row.steps)
            .bind(row.created_at)
            .execute(&self.pool)
            .await?;
        }

        Ok(test_cases.to_vec())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TestCase>, DbError> {
        let row: Option<TestCaseRow> = sqlx::query_as(
            r#"
            SELECT id, requirement_id, title, description, preconditions, steps, created_at
            FROM test_cases
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_domain()))
    }

    pub async fn find_by_requirement(&self, requirement_id: Uuid) -> Result<Vec<TestCase>, DbError> {
        let rows: Vec<TestCaseRow> = sqlx::query_as(
            r#"
            SELECT id, requirement_id, title, description, preconditions, steps, created_at
            FROM test_cases
            WHERE requirement_id = ?
            ORDER BY rowid ASC
            "#,
        )
        .bind(requirement_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_domain()).collect())
    }

    pub async fn find_all(&self) -> Result<Vec<TestCase>, DbError> {
        let rows: Vec<TestCaseRow> = sqlx::query_as(
            r#"
            SELECT id, requirement_id, title, description, preconditions, steps, created_at
            FROM test_cases
            ORDER BY rowid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_domain()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations, BucketRepository, RequirementRepository, SquadRepository};
    use pm_core::{Bucket, BucketKind, MetricInputs, Requirement, Squad, TestCaseDraft, TestStep};

    async fn setup_requirement() -> (SqlitePool, Requirement) {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        let bucket = Bucket::new(BucketKind::Change, "Changes");
        let squad = Squad::new("QA", "Quality team");
        BucketRepository::new(pool.clone()).create(&bucket).await.unwrap();
        SquadRepository::new(pool.clone()).create(&squad).await.unwrap();

        let requirement = Requirement::new(
            "Export",
            "CSV export",
            bucket.id,
            squad.id,
            MetricInputs::with_effort(3.0),
        );
        RequirementRepository::new(pool.clone())
            .upsert(&requirement)
            .await
            .unwrap();

        (pool, requirement)
    }

    fn case(requirement_id: Uuid, title: &str) -> TestCase {
        TestCase::new(
            requirement_id,
            TestCaseDraft {
                title: title.to_string(),
                description: format!("{title} checks"),
                preconditions: vec!["User is logged in".to_string()],
                steps: vec![
                    TestStep::new(1, "Open export", "Dialog shown"),
                    TestStep::new(2, "Confirm", "File downloaded"),
                ],
            },
        )
    }

    #[tokio::test]
    async fn test_create_many_preserves_order() {
        let (pool, requirement) = setup_requirement().await;
        let repo = TestCaseRepository::new(pool);

        let cases = vec![case(requirement.id, "First"), case(requirement.id, "Second")];
        repo.create_many(&cases).await.unwrap();

        let found = repo.find_by_requirement(requirement.id).await.unwrap();
        let titles: Vec<_> = found.iter().map(|c| c.content.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
        assert_eq!(found[0].content.steps.len(), 2);
        assert_eq!(found[0].content.steps[1].expected_result, "File downloaded");
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let (pool, requirement) = setup_requirement().await;
        let repo = TestCaseRepository::new(pool);

        let created = case(requirement.id, "Only");
        repo.create_many(std::slice::from_ref(&created)).await.unwrap();

        let found = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.content, created.content);
        assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }
}
