use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::reference::{Bucket, Squad};
use crate::error::{CoreError, Result};
use crate::metrics::{MetricInputs, Metrics, MetricsInput};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema, Hash)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    #[default]
    Proposed,
    Approved,
    InProgress,
    Completed,
    Rejected,
}

impl RequirementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proposed => "proposed",
            Self::Approved => "approved",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "proposed" => Some(Self::Proposed),
            "approved" => Some(Self::Approved),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Requirement {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub bucket_id: Uuid,
    pub squad_id: Uuid,
    pub metrics: Metrics,
    /// Rank among all requirements, 1 = highest. 0 until the first re-rank.
    pub priority: i64,
    pub status: RequirementStatus,
    pub prd_id: Option<Uuid>,
    /// Generated test cases, in generation order.
    pub test_case_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Requirement {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        bucket_id: Uuid,
        squad_id: Uuid,
        inputs: MetricInputs,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            bucket_id,
            squad_id,
            metrics: Metrics::compute(inputs),
            priority: 0,
            status: RequirementStatus::default(),
            prd_id: None,
            test_case_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Replace the metric inputs and recompute the derived values.
    pub fn set_metrics(&mut self, inputs: MetricInputs) {
        self.metrics = Metrics::compute(inputs);
        self.updated_at = Utc::now();
    }

    pub fn roi(&self) -> f64 {
        self.metrics.roi
    }
}

/// Body of a create-requirement call. Fields are optional at the wire level
/// so a missing field is reported as a validation error naming it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct CreateRequirementRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub bucket_id: Option<Uuid>,
    #[serde(default)]
    pub squad_id: Option<Uuid>,
    #[serde(default)]
    pub metrics: MetricsInput,
}

impl CreateRequirementRequest {
    pub fn into_requirement(self) -> Result<Requirement> {
        let title = required_text(self.title, "Title is required")?;
        let description = required_text(self.description, "Description is required")?;
        let bucket_id = self
            .bucket_id
            .ok_or_else(|| CoreError::validation("Bucket is required"))?;
        let squad_id = self
            .squad_id
            .ok_or_else(|| CoreError::validation("Squad is required"))?;
        let inputs = MetricInputs::from_input(&self.metrics)?;

        Ok(Requirement::new(
            title,
            description,
            bucket_id,
            squad_id,
            inputs,
        ))
    }
}

fn required_text(value: Option<String>, message: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(CoreError::validation(message)),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct UpdateStatusRequest {
    pub status: RequirementStatus,
}

/// A requirement with its bucket and squad resolved.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct RequirementDetails {
    #[serde(flatten)]
    pub requirement: Requirement,
    pub bucket: Bucket,
    pub squad: Squad,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsInput;

    fn request() -> CreateRequirementRequest {
        CreateRequirementRequest {
            title: Some("  Login  ".to_string()),
            description: Some("Users can log in".to_string()),
            bucket_id: Some(Uuid::new_v4()),
            squad_id: Some(Uuid::new_v4()),
            metrics: MetricsInput {
                effort_man_days: Some(25.0),
                revenue_estimate: Some(12500.0),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_requirement_creation_computes_metrics() {
        let requirement = request().into_requirement().unwrap();

        assert_eq!(requirement.title, "Login");
        assert_eq!(requirement.status, RequirementStatus::Proposed);
        assert_eq!(requirement.priority, 0);
        assert_eq!(requirement.metrics.sprint_estimate, 3);
        assert_eq!(requirement.roi(), 1.0);
        assert!(requirement.prd_id.is_none());
        assert!(requirement.test_case_ids.is_empty());
    }

    #[test]
    fn test_missing_fields_are_validation_errors() {
        let mut no_title = request();
        no_title.title = Some("   ".to_string());
        assert!(matches!(
            no_title.into_requirement(),
            Err(CoreError::Validation(msg)) if msg.contains("Title")
        ));

        let mut no_bucket = request();
        no_bucket.bucket_id = None;
        assert!(matches!(
            no_bucket.into_requirement(),
            Err(CoreError::Validation(msg)) if msg.contains("Bucket")
        ));

        let mut no_squad = request();
        no_squad.squad_id = None;
        assert!(no_squad.into_requirement().is_err());

        let mut no_effort = request();
        no_effort.metrics.effort_man_days = None;
        assert!(matches!(
            no_effort.into_requirement(),
            Err(CoreError::Validation(msg)) if msg.contains("Effort")
        ));
    }

    #[test]
    fn test_set_metrics_recomputes() {
        let mut requirement = request().into_requirement().unwrap();
        requirement.set_metrics(MetricInputs::with_effort(5.0).revenue(5000.0));

        assert_eq!(requirement.roi(), 2.0);
        assert_eq!(requirement.metrics.sprint_estimate, 1);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            RequirementStatus::parse("in_progress"),
            Some(RequirementStatus::InProgress)
        );
        assert_eq!(RequirementStatus::Rejected.as_str(), "rejected");
        assert_eq!(RequirementStatus::parse("done"), None);
    }
}
