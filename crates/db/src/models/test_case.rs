use pm_core::{TestCase, TestCaseDraft};
use uuid::Uuid;

use super::{datetime_to_timestamp, timestamp_to_datetime};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TestCaseRow {
    pub id: String,
    pub requirement_id: String,
    pub title: String,
    pub description: String,
    pub preconditions: String,
    pub steps: String,
    pub created_at: i64,
}

impl TestCaseRow {
    pub fn into_domain(self) -> TestCase {
        TestCase {
            id: Uuid::parse_str(&self.id).unwrap_or_default(),
            requirement_id: Uuid::parse_str(&self.requirement_id).unwrap_or_default(),
            content: TestCaseDraft {
                title: self.title,
                description: self.description,
                preconditions: serde_json::from_str(&self.preconditions).unwrap_or_default(),
                steps: serde_json::from_str(&self.steps).unwrap_or_default(),
            },
            created_at: timestamp_to_datetime(self.created_at),
        }
    }
}

impl TryFrom<&TestCase> for TestCaseRow {
    type Error = serde_json::Error;

    fn try_from(test_case: &TestCase) -> Result<Self, Self::Error> {
        Ok(Self {
            id: test_case.id.to_string(),
            requirement_id: test_case.requirement_id.to_string(),
            title: test_case.content.title.clone(),
            description: test_case.content.description.clone(),
            preconditions: serde_json::to_string(&test_case.content.preconditions)?,
            steps: serde_json::to_string(&test_case.content.steps)?,
            created_at: datetime_to_timestamp(test_case.created_at),
        })
    }
}
