use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct TestStep {
    /// 1-based position within the test case.
    pub step_number: u32,
    pub action: String,
    pub expected_result: String,
}

impl TestStep {
    pub fn new(step_number: u32, action: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            step_number,
            action: action.into(),
            expected_result: expected.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct TestCaseDraft {
    pub title: String,
    pub description: String,
    pub preconditions: Vec<String>,
    pub steps: Vec<TestStep>,
}

impl TestCaseDraft {
    /// Steps must read 1..=n in listed order. Returns true when the numbering
    /// had to be rewritten.
    pub fn normalize_steps(&mut self) -> bool {
        let contiguous = self
            .steps
            .iter()
            .enumerate()
            .all(|(i, step)| step.step_number as usize == i + 1);

        if contiguous {
            return false;
        }

        for (i, step) in self.steps.iter_mut().enumerate() {
            step.step_number = i as u32 + 1;
        }
        true
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct TestCase {
    pub id: Uuid,
    pub requirement_id: Uuid,
    #[serde(flatten)]
    pub content: TestCaseDraft,
    pub created_at: DateTime<Utc>,
}

impl TestCase {
    pub fn new(requirement_id: Uuid, content: TestCaseDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            requirement_id,
            content,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(numbers: &[u32]) -> TestCaseDraft {
        TestCaseDraft {
            title: "Checkout".to_string(),
            description: "Checkout works".to_string(),
            preconditions: vec![],
            steps: numbers
                .iter()
                .map(|n| TestStep::new(*n, format!("action {}", n), "ok"))
                .collect(),
        }
    }

    #[test]
    fn test_contiguous_steps_untouched() {
        let mut case = draft(&[1, 2, 3]);
        assert!(!case.normalize_steps());
        assert_eq!(case.steps[2].step_number, 3);
    }

    #[test]
    fn test_gaps_and_duplicates_renumbered_in_order() {
        let mut case = draft(&[2, 2, 7]);
        assert!(case.normalize_steps());

        let numbers: Vec<u32> = case.steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(case.steps[2].action, "action 7");
    }

    #[test]
    fn test_zero_based_renumbered() {
        let mut case = draft(&[0, 1]);
        assert!(case.normalize_steps());
        assert_eq!(case.steps[0].step_number, 1);
    }
}
