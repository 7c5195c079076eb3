use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::requirement::Requirement;

/// Placeholder for any delta-prototype field a draft leaves out.
pub const NOT_PROVIDED: &str = "Not provided";

fn not_provided() -> String {
    NOT_PROVIDED.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct DeltaPrototypes {
    #[serde(default = "not_provided")]
    pub current_state: String,
    #[serde(default = "not_provided")]
    pub proposed_changes: String,
    #[serde(default = "not_provided")]
    pub user_flow: String,
    #[serde(default = "not_provided")]
    pub api_linkages: String,
    #[serde(default = "not_provided")]
    pub corner_cases: String,
}

impl Default for DeltaPrototypes {
    fn default() -> Self {
        Self {
            current_state: not_provided(),
            proposed_changes: not_provided(),
            user_flow: not_provided(),
            api_linkages: not_provided(),
            corner_cases: not_provided(),
        }
    }
}

/// Generated PRD content, before it is attached to a requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct PrdDraft {
    pub overview: String,
    pub user_stories: Vec<String>,
    pub ui_design: String,
    pub backend_logic: String,
    /// Mermaid sources: a sequence diagram then a component diagram.
    pub diagrams: Vec<String>,
    pub solution_delta: String,
    pub delta_prototypes: DeltaPrototypes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct GeneratedBy {
    pub provider: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Prd {
    pub id: Uuid,
    pub requirement_id: Uuid,
    pub title: String,
    #[serde(flatten)]
    pub content: PrdDraft,
    pub generated_by: GeneratedBy,
    pub created_at: DateTime<Utc>,
}

impl Prd {
    pub fn from_draft(requirement: &Requirement, content: PrdDraft, generated_by: GeneratedBy) -> Self {
        Self {
            id: Uuid::new_v4(),
            requirement_id: requirement.id,
            title: format!("PRD: {}", requirement.title),
            content,
            generated_by,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_prototypes_default_to_not_provided() {
        let partial: DeltaPrototypes =
            serde_json::from_str(r#"{"current_state": "Legacy login form"}"#).unwrap();

        assert_eq!(partial.current_state, "Legacy login form");
        assert_eq!(partial.proposed_changes, NOT_PROVIDED);
        assert_eq!(partial.user_flow, NOT_PROVIDED);
        assert_eq!(partial.api_linkages, NOT_PROVIDED);
        assert_eq!(partial.corner_cases, NOT_PROVIDED);
        assert_eq!(DeltaPrototypes::default().corner_cases, NOT_PROVIDED);
    }
}
