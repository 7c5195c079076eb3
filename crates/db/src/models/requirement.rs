use pm_core::{MetricInputs, Metrics, Requirement, RequirementStatus};
use uuid::Uuid;

use super::{datetime_to_timestamp, timestamp_to_datetime};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RequirementRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub bucket_id: String,
    pub squad_id: String,
    pub revenue_estimate: f64,
    pub cost_saving: f64,
    pub client_count: i64,
    pub client_boost: f64,
    pub effort_man_days: f64,
    pub cost_per_man_day: f64,
    pub roi: f64,
    pub sprint_estimate: i64,
    pub priority: i64,
    pub status: String,
    pub prd_id: Option<String>,
    pub test_case_ids: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl RequirementRow {
    pub fn into_domain(self) -> Requirement {
        let inputs = MetricInputs {
            revenue_estimate: self.revenue_estimate,
            cost_saving: self.cost_saving,
            client_count: u32::try_from(self.client_count).unwrap_or(1),
            client_boost: self.client_boost,
            effort_man_days: self.effort_man_days,
            cost_per_man_day: self.cost_per_man_day,
        };

        Requirement {
            id: Uuid::parse_str(&self.id).unwrap_or_default(),
            title: self.title,
            description: self.description,
            bucket_id: Uuid::parse_str(&self.bucket_id).unwrap_or_default(),
            squad_id: Uuid::parse_str(&self.squad_id).unwrap_or_default(),
            metrics: Metrics {
                inputs,
                roi: self.roi,
                sprint_estimate: u32::try_from(self.sprint_estimate).unwrap_or_default(),
            },
            priority: self.priority,
            status: RequirementStatus::parse(&self.status).unwrap_or_default(),
            prd_id: self.prd_id.and_then(|s| Uuid::parse_str(&s).ok()),
            test_case_ids: serde_json::from_str(&self.test_case_ids).unwrap_or_default(),
            created_at: timestamp_to_datetime(self.created_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        }
    }
}

impl From<&Requirement> for RequirementRow {
    fn from(requirement: &Requirement) -> Self {
        let inputs = &requirement.metrics.inputs;
        Self {
            id: requirement.id.to_string(),
            title: requirement.title.clone(),
            description: requirement.description.clone(),
            bucket_id: requirement.bucket_id.to_string(),
            squad_id: requirement.squad_id.to_string(),
            revenue_estimate: inputs.revenue_estimate,
            cost_saving: inputs.cost_saving,
            client_count: i64::from(inputs.client_count),
            client_boost: inputs.client_boost,
            effort_man_days: inputs.effort_man_days,
            cost_per_man_day: inputs.cost_per_man_day,
            roi: requirement.metrics.roi,
            sprint_estimate: i64::from(requirement.metrics.sprint_estimate),
            priority: requirement.priority,
            status: requirement.status.as_str().to_string(),
            prd_id: requirement.prd_id.map(|id| id.to_string()),
            test_case_ids: serde_json::to_string(&requirement.test_case_ids)
                .unwrap_or_else(|_| "[]".to_string()),
            created_at: datetime_to_timestamp(requirement.created_at),
            updated_at: datetime_to_timestamp(requirement.updated_at),
        }
    }
}
