//! ROI and sprint-estimate computation.
//!
//! The same [`compute_metrics`] runs when a requirement is saved and when a
//! client asks for a live preview, so a previewed value never disagrees with
//! the persisted one.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{CoreError, Result};

/// Man-days one full-time engineer delivers in a sprint.
pub const MAN_DAYS_PER_SPRINT: f64 = 10.0;

pub const DEFAULT_REVENUE_ESTIMATE: f64 = 0.0;
pub const DEFAULT_COST_SAVING: f64 = 0.0;
pub const DEFAULT_CLIENT_COUNT: u32 = 1;
pub const DEFAULT_CLIENT_BOOST: f64 = 1.0;
pub const DEFAULT_COST_PER_MAN_DAY: f64 = 500.0;

pub const MIN_EFFORT_MAN_DAYS: f64 = 0.5;
pub const MIN_CLIENT_BOOST: f64 = 1.0;
pub const MAX_CLIENT_BOOST: f64 = 10.0;

/// Metric fields as a client submits them. Every field except the effort is
/// optional and falls back to the defaults above.
///
/// Derived values (`roi`, `sprint_estimate`) are not part of the input; if a
/// client sends them they are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct MetricsInput {
    #[serde(default)]
    pub revenue_estimate: Option<f64>,
    #[serde(default)]
    pub cost_saving: Option<f64>,
    #[serde(default)]
    pub client_count: Option<u32>,
    #[serde(default)]
    pub client_boost: Option<f64>,
    #[serde(default)]
    pub effort_man_days: Option<f64>,
    #[serde(default)]
    pub cost_per_man_day: Option<f64>,
}

/// Validated metric inputs with all defaults applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct MetricInputs {
    pub revenue_estimate: f64,
    pub cost_saving: f64,
    pub client_count: u32,
    pub client_boost: f64,
    pub effort_man_days: f64,
    pub cost_per_man_day: f64,
}

impl MetricInputs {
    /// Inputs for the given effort with every other field at its default.
    pub fn with_effort(effort_man_days: f64) -> Self {
        Self {
            revenue_estimate: DEFAULT_REVENUE_ESTIMATE,
            cost_saving: DEFAULT_COST_SAVING,
            client_count: DEFAULT_CLIENT_COUNT,
            client_boost: DEFAULT_CLIENT_BOOST,
            effort_man_days,
            cost_per_man_day: DEFAULT_COST_PER_MAN_DAY,
        }
    }

    pub fn revenue(mut self, revenue_estimate: f64) -> Self {
        self.revenue_estimate = revenue_estimate;
        self
    }

    pub fn saving(mut self, cost_saving: f64) -> Self {
        self.cost_saving = cost_saving;
        self
    }

    pub fn clients(mut self, client_count: u32, client_boost: f64) -> Self {
        self.client_count = client_count;
        self.client_boost = client_boost;
        self
    }

    pub fn cost_per_man_day(mut self, cost_per_man_day: f64) -> Self {
        self.cost_per_man_day = cost_per_man_day;
        self
    }

    /// Apply defaults to a submitted input and validate the result.
    pub fn from_input(input: &MetricsInput) -> Result<Self> {
        let effort = input
            .effort_man_days
            .ok_or_else(|| CoreError::validation("Effort in man-days is required"))?;

        let inputs = Self {
            revenue_estimate: input.revenue_estimate.unwrap_or(DEFAULT_REVENUE_ESTIMATE),
            cost_saving: input.cost_saving.unwrap_or(DEFAULT_COST_SAVING),
            client_count: input.client_count.unwrap_or(DEFAULT_CLIENT_COUNT),
            client_boost: input.client_boost.unwrap_or(DEFAULT_CLIENT_BOOST),
            effort_man_days: effort,
            cost_per_man_day: input.cost_per_man_day.unwrap_or(DEFAULT_COST_PER_MAN_DAY),
        };
        inputs.validate()?;
        Ok(inputs)
    }

    pub fn validate(&self) -> Result<()> {
        check_non_negative("revenue_estimate", self.revenue_estimate)?;
        check_non_negative("cost_saving", self.cost_saving)?;
        // Zero is accepted here; compute_metrics clamps a zero denominator.
        check_non_negative("cost_per_man_day", self.cost_per_man_day)?;

        if self.client_count < 1 {
            return Err(CoreError::validation("client_count must be at least 1"));
        }
        if !self.client_boost.is_finite()
            || !(MIN_CLIENT_BOOST..=MAX_CLIENT_BOOST).contains(&self.client_boost)
        {
            return Err(CoreError::validation(format!(
                "client_boost must be between {} and {}",
                MIN_CLIENT_BOOST, MAX_CLIENT_BOOST
            )));
        }
        if !self.effort_man_days.is_finite() || self.effort_man_days < MIN_EFFORT_MAN_DAYS {
            return Err(CoreError::validation(format!(
                "effort_man_days must be at least {}",
                MIN_EFFORT_MAN_DAYS
            )));
        }
        if !compute_metrics(self).roi.is_finite() {
            return Err(CoreError::validation(
                "Metric inputs are too large to compute a finite ROI",
            ));
        }

        Ok(())
    }
}

fn check_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::validation(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(())
}

/// Values derived from [`MetricInputs`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct MetricsOutcome {
    pub roi: f64,
    pub sprint_estimate: u32,
}

/// `roi = ((revenue + saving) * clients * boost) / (effort * cost_per_man_day)`,
/// `sprint_estimate = ceil(effort / 10)`.
///
/// Total over its input: a denominator that is not strictly positive yields an
/// ROI of 0 rather than infinity or NaN.
pub fn compute_metrics(inputs: &MetricInputs) -> MetricsOutcome {
    let numerator = (inputs.revenue_estimate + inputs.cost_saving)
        * f64::from(inputs.client_count)
        * inputs.client_boost;
    let denominator = inputs.effort_man_days * inputs.cost_per_man_day;

    let roi = if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    };

    // `as` saturates, so a NaN effort cannot panic here.
    let sprint_estimate = (inputs.effort_man_days / MAN_DAYS_PER_SPRINT).ceil() as u32;

    MetricsOutcome {
        roi,
        sprint_estimate,
    }
}

/// Stored metrics: the inputs plus the values last computed from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Metrics {
    #[serde(flatten)]
    pub inputs: MetricInputs,
    pub roi: f64,
    pub sprint_estimate: u32,
}

impl Metrics {
    pub fn compute(inputs: MetricInputs) -> Self {
        let outcome = compute_metrics(&inputs);
        Self {
            inputs,
            roi: outcome.roi,
            sprint_estimate: outcome.sprint_estimate,
        }
    }

    pub fn outcome(&self) -> MetricsOutcome {
        MetricsOutcome {
            roi: self.roi,
            sprint_estimate: self.sprint_estimate,
        }
    }
}
