pub mod domain;
mod error;
pub mod metrics;
pub mod priority;
mod store;
pub mod summary;

pub use domain::*;
pub use error::*;
pub use metrics::{compute_metrics, MetricInputs, Metrics, MetricsInput, MetricsOutcome};
pub use priority::{rank_by_roi, PriorityAssignment, PriorityOrderer};
pub use store::RequirementStore;
pub use summary::{summarize, PortfolioSummary, SummaryFilter};
