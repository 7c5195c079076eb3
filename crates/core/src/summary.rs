//! Portfolio-level rollups of requirement metrics.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{Bucket, BucketKind, Requirement, Squad};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[into_params(parameter_in = Query)]
pub struct SummaryFilter {
    pub bucket_id: Option<Uuid>,
    pub squad_id: Option<Uuid>,
}

impl SummaryFilter {
    pub fn matches(&self, requirement: &Requirement) -> bool {
        self.bucket_id.map_or(true, |id| requirement.bucket_id == id)
            && self.squad_id.map_or(true, |id| requirement.squad_id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct BucketRollup {
    pub bucket_id: Uuid,
    pub name: BucketKind,
    pub requirement_count: usize,
    pub average_roi: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct SquadRollup {
    pub squad_id: Uuid,
    pub name: String,
    pub requirement_count: usize,
    pub total_effort_man_days: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct PortfolioSummary {
    pub requirement_count: usize,
    pub total_revenue: f64,
    pub total_cost_saving: f64,
    pub total_effort_man_days: f64,
    pub total_sprints: u64,
    pub average_roi: f64,
    pub by_bucket: Vec<BucketRollup>,
    pub by_squad: Vec<SquadRollup>,
}

fn average_roi<'a>(requirements: impl Iterator<Item = &'a Requirement>) -> (usize, f64) {
    let (count, sum) = requirements.fold((0usize, 0.0f64), |(n, sum), r| (n + 1, sum + r.roi()));
    if count == 0 {
        (0, 0.0)
    } else {
        (count, sum / count as f64)
    }
}

/// Totals over the requirements matching `filter`. Every bucket and squad gets
/// a rollup entry, zeroed when nothing matches it.
pub fn summarize(
    requirements: &[Requirement],
    buckets: &[Bucket],
    squads: &[Squad],
    filter: &SummaryFilter,
) -> PortfolioSummary {
    let selected: Vec<&Requirement> = requirements.iter().filter(|r| filter.matches(r)).collect();

    let mut total_revenue = 0.0;
    let mut total_cost_saving = 0.0;
    let mut total_effort_man_days = 0.0;
    let mut total_sprints = 0u64;
    for r in &selected {
        total_revenue += r.metrics.inputs.revenue_estimate;
        total_cost_saving += r.metrics.inputs.cost_saving;
        total_effort_man_days += r.metrics.inputs.effort_man_days;
        total_sprints += u64::from(r.metrics.sprint_estimate);
    }

    let (requirement_count, average) = average_roi(selected.iter().copied());

    let by_bucket = buckets
        .iter()
        .map(|bucket| {
            let (count, avg) =
                average_roi(selected.iter().copied().filter(|r| r.bucket_id == bucket.id));
            BucketRollup {
                bucket_id: bucket.id,
                name: bucket.name,
                requirement_count: count,
                average_roi: avg,
            }
        })
        .collect();

    let by_squad = squads
        .iter()
        .map(|squad| {
            let members: Vec<&&Requirement> =
                selected.iter().filter(|r| r.squad_id == squad.id).collect();
            SquadRollup {
                squad_id: squad.id,
                name: squad.name.clone(),
                requirement_count: members.len(),
                total_effort_man_days: members.iter().map(|r| r.metrics.inputs.effort_man_days).sum(),
            }
        })
        .collect();

    PortfolioSummary {
        requirement_count,
        total_revenue,
        total_cost_saving,
        total_effort_man_days,
        total_sprints,
        average_roi: average,
        by_bucket,
        by_squad,
    }
}
