//! Tunable parameters of the metric transforms.

use chrono::TimeDelta;

use crate::error::{MetricError, Result};

/// Upper bound on the rate-over-time grid length.
pub const DEFAULT_MAX_RATE_BUCKETS: usize = 1_000_000;

/// Parameters shared by the metric transforms.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricConfig {
    /// Width of rate-over-time buckets.
    pub bucket_width: TimeDelta,
    /// Trailing window for rolling latency percentiles.
    pub percentile_window: TimeDelta,
    /// Number of bins in the allocation size histogram.
    pub size_bins: usize,
    pub heatmap_time_bins: usize,
    pub heatmap_size_bins: usize,
    /// Largest bucket grid the rate transform will allocate.
    pub max_rate_buckets: usize,
}

impl Default for MetricConfig {
    fn default() -> Self {
        Self {
            bucket_width: TimeDelta::seconds(1),
            percentile_window: TimeDelta::seconds(10),
            size_bins: 30,
            heatmap_time_bins: 50,
            heatmap_size_bins: 50,
            max_rate_buckets: DEFAULT_MAX_RATE_BUCKETS,
        }
    }
}

impl MetricConfig {
    #[must_use]
    pub fn with_bucket_width(mut self, width: TimeDelta) -> Self {
        self.bucket_width = width;
        self
    }

    #[must_use]
    pub fn with_percentile_window(mut self, window: TimeDelta) -> Self {
        self.percentile_window = window;
        self
    }

    #[must_use]
    pub fn with_max_rate_buckets(mut self, limit: usize) -> Self {
        self.max_rate_buckets = limit;
        self
    }

    /// Checks every parameter.
    pub fn validate(&self) -> Result<()> {
        positive_micros("bucket_width", self.bucket_width)?;
        positive_micros("percentile_window", self.percentile_window)?;
        nonzero_bins("size_bins", self.size_bins)?;
        nonzero_bins("heatmap_time_bins", self.heatmap_time_bins)?;
        nonzero_bins("heatmap_size_bins", self.heatmap_size_bins)?;
        nonzero_bins("max_rate_buckets", self.max_rate_buckets)?;
        Ok(())
    }
}

/// Converts a duration to whole microseconds, rejecting anything below one.
pub(crate) fn positive_micros(name: &'static str, value: TimeDelta) -> Result<i64> {
    match value.num_microseconds() {
        Some(micros) if micros >= 1 => Ok(micros),
        _ => Err(MetricError::InvalidParameter {
            name,
            reason: format!("must be at least one microsecond, got {value}"),
        }),
    }
}

pub(crate) fn nonzero_bins(name: &'static str, bins: usize) -> Result<usize> {
    if bins == 0 {
        return Err(MetricError::InvalidParameter {
            name,
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(bins)
}

/// Converts fractional seconds from user input into a duration.
pub fn seconds(value: f64) -> Result<TimeDelta> {
    if !value.is_finite() || value <= 0.0 {
        return Err(MetricError::InvalidParameter {
            name: "seconds",
            reason: format!("must be a positive number, got {value}"),
        });
    }
    let micros = (value * 1_000_000.0).round();
    if micros < 1.0 || micros > i64::MAX as f64 {
        return Err(MetricError::InvalidParameter {
            name: "seconds",
            reason: format!("{value} is out of range"),
        });
    }
    Ok(TimeDelta::microseconds(micros as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = MetricConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bucket_width, TimeDelta::seconds(1));
        assert_eq!(config.percentile_window, TimeDelta::seconds(10));
        assert_eq!(config.size_bins, 30);
        assert_eq!(config.heatmap_time_bins, 50);
        assert_eq!(config.max_rate_buckets, DEFAULT_MAX_RATE_BUCKETS);
    }

    #[test]
    fn rejects_zero_bucket_limit() {
        let config = MetricConfig::default().with_max_rate_buckets(0);
        assert!(matches!(
            config.validate(),
            Err(MetricError::InvalidParameter {
                name: "max_rate_buckets",
                ..
            })
        ));
    }

    #[test]
    fn rejects_non_positive_widths() {
        let config = MetricConfig::default().with_bucket_width(TimeDelta::zero());
        assert!(matches!(
            config.validate(),
            Err(MetricError::InvalidParameter {
                name: "bucket_width",
                ..
            })
        ));
        let config = MetricConfig::default().with_percentile_window(TimeDelta::seconds(-1));
        assert!(config.validate().is_err());
    }

    #[test]
    fn converts_fractional_seconds() {
        assert_eq!(seconds(0.5).unwrap(), TimeDelta::milliseconds(500));
        assert!(seconds(0.0).is_err());
        assert!(seconds(f64::NAN).is_err());
    }
}
