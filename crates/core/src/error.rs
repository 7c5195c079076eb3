use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Requirement not found: {0}")]
    RequirementNotFound(Uuid),

    #[error("Bucket not found: {0}")]
    BucketNotFound(Uuid),

    #[error("Squad not found: {0}")]
    SquadNotFound(Uuid),

    #[error("PRD already exists for requirement: {0}")]
    PrdAlreadyExists(Uuid),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let id = Uuid::new_v4();
        let error = CoreError::RequirementNotFound(id);
        assert!(error.to_string().contains(&id.to_string()));
    }

    #[test]
    fn test_conflict_display_names_requirement() {
        let id = Uuid::new_v4();
        let error = CoreError::PrdAlreadyExists(id);
        assert_eq!(
            error.to_string(),
            format!("PRD already exists for requirement: {}", id)
        );
    }
}
