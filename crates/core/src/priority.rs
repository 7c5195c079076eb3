//! Backlog ordering.
//!
//! Two ways to set `priority`:
//!
//! - after every insert, all requirements are re-ranked by ROI, highest first;
//! - a caller can write an explicit order, taken verbatim.
//!
//! The two are not reconciled. A manual order survives until the next insert,
//! whose re-rank overwrites it with the ROI order.
//!
//! Every insert rewrites every rank (O(n) reads and writes). An
//! order-statistics tree keyed by ROI would make this incremental.

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Requirement;
use crate::error::{CoreError, Result};
use crate::store::RequirementStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct PriorityAssignment {
    pub id: Uuid,
    pub priority: i64,
}

/// Ranks by ROI descending, 1-based. The sort is stable, so requirements with
/// equal ROI keep the order they were given in.
pub fn rank_by_roi(requirements: &[Requirement]) -> Vec<PriorityAssignment> {
    let mut ordered: Vec<&Requirement> = requirements.iter().collect();
    ordered.sort_by(|a, b| b.roi().total_cmp(&a.roi()));

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, requirement)| PriorityAssignment {
            id: requirement.id,
            priority: index as i64 + 1,
        })
        .collect()
}

/// Sorts by stored priority ascending; ties keep their given order.
pub fn sort_by_priority(requirements: &mut [Requirement]) {
    requirements.sort_by_key(|r| r.priority);
}

pub struct PriorityOrderer<S> {
    store: S,
    // Single writer per process for rank writes. Not a transaction: a failed
    // write still leaves the earlier writes of the same pass in place.
    write_lock: Mutex<()>,
}

impl<S: RequirementStore> PriorityOrderer<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persist a freshly built requirement, re-rank the backlog, and return
    /// the stored record with its assigned priority.
    pub async fn submit(&self, requirement: Requirement) -> Result<Requirement> {
        let saved = self.store.save(&requirement).await?;
        self.reprioritize_after_insert(saved.id).await?;

        self.store
            .find_by_id(saved.id)
            .await?
            .ok_or(CoreError::RequirementNotFound(saved.id))
    }

    pub async fn reprioritize_after_insert(&self, inserted: Uuid) -> Result<Vec<PriorityAssignment>> {
        let _guard = self.write_lock.lock().await;

        let requirements = self.store.find_all().await?;
        let ranking = rank_by_roi(&requirements);

        debug!(
            requirement_id = %inserted,
            total = ranking.len(),
            "Re-ranking backlog by ROI"
        );

        for (written, assignment) in ranking.iter().enumerate() {
            match self
                .store
                .update_priority(assignment.id, assignment.priority)
                .await
            {
                Ok(true) => {}
                Ok(false) => {
                    warn!(requirement_id = %assignment.id, "Requirement vanished during re-rank");
                }
                Err(e) => {
                    error!(
                        requirement_id = %assignment.id,
                        written,
                        total = ranking.len(),
                        error = %e,
                        "Re-rank aborted; earlier priorities already written"
                    );
                    return Err(e);
                }
            }
        }

        info!(total = ranking.len(), "Backlog re-ranked");
        Ok(ranking)
    }

    /// Write caller-supplied priorities as given. No ROI is recomputed and
    /// the values need not form a 1..n permutation. Every id is checked
    /// before anything is written.
    pub async fn apply_manual_order(&self, order: &[PriorityAssignment]) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        for assignment in order {
            if self.store.find_by_id(assignment.id).await?.is_none() {
                return Err(CoreError::RequirementNotFound(assignment.id));
            }
        }

        for assignment in order {
            if !self
                .store
                .update_priority(assignment.id, assignment.priority)
                .await?
            {
                warn!(requirement_id = %assignment.id, "Requirement vanished during manual reorder");
            }
        }

        info!(count = order.len(), "Applied manual backlog order");
        Ok(())
    }

    pub async fn list_by_priority(&self) -> Result<Vec<Requirement>> {
        let mut requirements = self.store.find_all().await?;
        sort_by_priority(&mut requirements);
        Ok(requirements)
    }
}
