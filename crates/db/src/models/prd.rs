use pm_core::{GeneratedBy, Prd, PrdDraft};
use uuid::Uuid;

use super::{datetime_to_timestamp, timestamp_to_datetime};

/// List-valued and nested PRD fields are stored as JSON text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PrdRow {
    pub id: String,
    pub requirement_id: String,
    pub title: String,
    pub overview: String,
    pub user_stories: String,
    pub ui_design: String,
    pub backend_logic: String,
    pub diagrams: String,
    pub solution_delta: String,
    pub delta_prototypes: String,
    pub generated_by_provider: String,
    pub generated_by_model: String,
    pub created_at: i64,
}

impl PrdRow {
    pub fn into_domain(self) -> Prd {
        Prd {
            id: Uuid::parse_str(&self.id).unwrap_or_default(),
            requirement_id: Uuid::parse_str(&self.requirement_id).unwrap_or_default(),
            title: self.title,
            content: PrdDraft {
                overview: self.overview,
                user_stories: serde_json::from_str(&self.user_stories).unwrap_or_default(),
                ui_design: self.ui_design,
                backend_logic: self.backend_logic,
                diagrams: serde_json::from_str(&self.diagrams).unwrap_or_default(),
                solution_delta: self.solution_delta,
                delta_prototypes: serde_json::from_str(&self.delta_prototypes)
                    .unwrap_or_default(),
            },
            generated_by: GeneratedBy {
                provider: self.generated_by_provider,
                model: self.generated_by_model,
            },
            created_at: timestamp_to_datetime(self.created_at),
        }
    }
}

impl TryFrom<&Prd> for PrdRow {
    type Error = serde_json::Error;

    fn try_from(prd: &Prd) -> Result<Self, Self::Error> {
        Ok(Self {
            id: prd.id.to_string(),
            requirement_id: prd.requirement_id.to_string(),
            title: prd.title.clone(),
            overview: prd.content.overview.clone(),
            user_stories: serde_json::to_string(&prd.content.user_stories)?,
            ui_design: prd.content.ui_design.clone(),
            backend_logic: prd.content.backend_logic.clone(),
            diagrams: serde_json::to_string(&prd.content.diagrams)?,
            solution_delta: prd.content.solution_delta.clone(),
            delta_prototypes: serde_json::to_string(&prd.content.delta_prototypes)?,
            generated_by_provider: prd.generated_by.provider.clone(),
            generated_by_model: prd.generated_by.model.clone(),
            created_at: datetime_to_timestamp(prd.created_at),
        })
    }
}
