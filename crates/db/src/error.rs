use pm_core::CoreError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Requirement not found: {0}")]
    RequirementNotFound(Uuid),

    #[error("PRD not found: {0}")]
    PrdNotFound(Uuid),

    #[error("Test case not found: {0}")]
    TestCaseNotFound(Uuid),

    #[error("Seeding failed: {0}")]
    Seed(String),

    #[error("Corrupt row in {table}: {reason}")]
    CorruptRow { table: &'static str, reason: String },
}

impl From<DbError> for CoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::RequirementNotFound(id) => CoreError::RequirementNotFound(id),
            other => CoreError::Storage(other.to_string()),
        }
    }
}
