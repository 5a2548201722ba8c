//! Computed-or-skipped result of a metric transform.

use serde::Serialize;
use std::fmt;

/// Why a metric produced nothing to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The input, after the metric's own filtering, had no events.
    NoData,
    /// Events exist but collapse onto a single bucket, bin, or point.
    InsufficientVariation,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoData => f.write_str("no data"),
            SkipReason::InsufficientVariation => f.write_str("insufficient variation"),
        }
    }
}

/// Result of a metric transform.
///
/// `Skipped` is a terminal, non-error outcome: the caller skips rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricOutcome<T> {
    Computed(T),
    Skipped(SkipReason),
}

impl<T> MetricOutcome<T> {
    pub fn no_data() -> Self {
        MetricOutcome::Skipped(SkipReason::NoData)
    }

    pub fn insufficient_variation() -> Self {
        MetricOutcome::Skipped(SkipReason::InsufficientVariation)
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, MetricOutcome::Computed(_))
    }

    pub fn computed(&self) -> Option<&T> {
        match self {
            MetricOutcome::Computed(value) => Some(value),
            MetricOutcome::Skipped(_) => None,
        }
    }

    pub fn into_computed(self) -> Option<T> {
        match self {
            MetricOutcome::Computed(value) => Some(value),
            MetricOutcome::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            MetricOutcome::Computed(_) => None,
            MetricOutcome::Skipped(reason) => Some(*reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MetricOutcome<U> {
        match self {
            MetricOutcome::Computed(value) => MetricOutcome::Computed(f(value)),
            MetricOutcome::Skipped(reason) => MetricOutcome::Skipped(reason),
        }
    }
}
