use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::Requirement;
use crate::error::Result;

/// Storage operations the priority orderer depends on.
#[async_trait]
pub trait RequirementStore: Send + Sync {
    /// Every requirement, unfiltered, in insertion order.
    async fn find_all(&self) -> Result<Vec<Requirement>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Requirement>>;

    /// Insert or replace a requirement as given. Metrics must already be
    /// computed; the store never derives them.
    async fn save(&self, requirement: &Requirement) -> Result<Requirement>;

    /// Write one rank. Returns false when no such requirement exists.
    async fn update_priority(&self, id: Uuid, priority: i64) -> Result<bool>;

    async fn exists_prd_for(&self, requirement_id: Uuid) -> Result<bool>;
}

#[async_trait]
impl<S: RequirementStore + ?Sized> RequirementStore for Arc<S> {
    async fn find_all(&self) -> Result<Vec<Requirement>> {
        (**self).find_all().await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Requirement>> {
        (**self).find_by_id(id).await
    }

    async fn save(&self, requirement: &Requirement) -> Result<Requirement> {
        (**self).save(requirement).await
    }

    async fn update_priority(&self, id: Uuid, priority: i64) -> Result<bool> {
        (**self).update_priority(id, priority).await
    }

    async fn exists_prd_for(&self, requirement_id: Uuid) -> Result<bool> {
        (**self).exists_prd_for(requirement_id).await
    }
}
