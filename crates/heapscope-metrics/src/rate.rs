//! Allocation and deallocation rates over fixed-width time buckets.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, TimeDelta};
use serde::Serialize;

use heapscope_model::{Dataset, Operation};

use crate::config::positive_micros;
use crate::error::{MetricError, Result};
use crate::outcome::MetricOutcome;
use crate::timeline::{micros, offset_micros};

/// Per-operation counts over the bucket grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationCounts {
    pub operation: Operation,
    /// One count per bucket, aligned with [`RateSeries::bucket_starts`].
    pub counts: Vec<u64>,
}

impl OperationCounts {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Dense bucket grid: every bucket from the first to the last occupied one,
/// for every observed operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSeries {
    pub bucket_width_secs: f64,
    /// Inclusive start of each half-open `[start, start + width)` bucket.
    pub bucket_starts: Vec<NaiveDateTime>,
    /// Ordered allocation, deallocation, then other labels alphabetically.
    pub operations: Vec<OperationCounts>,
}

impl RateSeries {
    pub fn counts_for(&self, operation: &Operation) -> Option<&[u64]> {
        self.operations
            .iter()
            .find(|c| &c.operation == operation)
            .map(|c| c.counts.as_slice())
    }
}

/// Counts operations per time bucket.
///
/// Buckets are anchored at the earliest timestamp floored to a multiple of
/// `bucket_width` since the Unix epoch. Fewer than two buckets is reported as
/// insufficient variation. A span needing more than `max_buckets` buckets is
/// rejected before anything is allocated.
pub fn rates_over_time(
    dataset: &Dataset,
    bucket_width: TimeDelta,
    max_buckets: usize,
) -> Result<MetricOutcome<RateSeries>> {
    let width = positive_micros("bucket_width", bucket_width)?;

    let stamped: Vec<(i64, &Operation)> = dataset
        .blocks()
        .map(|(event, block)| (micros(event.timestamp), &block.operation))
        .collect();
    let Some(first) = dataset.blocks().map(|(event, _)| event.timestamp).min() else {
        return Ok(MetricOutcome::no_data());
    };
    let min = micros(first);
    let max = stamped.iter().map(|(us, _)| *us).max().unwrap_or(min);
    let anchor = min.div_euclid(width) * width;

    // i128 so the span of chrono's full range cannot overflow.
    let needed = (i128::from(max) - i128::from(anchor)) / i128::from(width) + 1;
    let bucket_count = match usize::try_from(needed) {
        Ok(count) if count <= max_buckets => count,
        _ => {
            return Err(MetricError::GridTooLarge {
                buckets: needed.unsigned_abs(),
                limit: max_buckets,
            });
        }
    };
    if bucket_count < 2 {
        tracing::info!(bucket_count, "rates over time: insufficient variation");
        return Ok(MetricOutcome::insufficient_variation());
    }
    let bucket_of = |us: i64| ((us - anchor) / width) as usize;

    let mut counts: BTreeMap<&Operation, Vec<u64>> = BTreeMap::new();
    for (us, operation) in &stamped {
        let row = counts
            .entry(*operation)
            .or_insert_with(|| vec![0; bucket_count]);
        row[bucket_of(*us)] += 1;
    }

    let anchor_ts = DateTime::from_timestamp_micros(anchor)
        .map_or(first, |dt| dt.naive_utc());
    let bucket_starts = (0..bucket_count)
        .map(|idx| offset_micros(anchor_ts, idx as i64 * width))
        .collect();

    Ok(MetricOutcome::Computed(RateSeries {
        bucket_width_secs: width as f64 / 1_000_000.0,
        bucket_starts,
        operations: counts
            .into_iter()
            .map(|(operation, counts)| OperationCounts {
                operation: operation.clone(),
                counts,
            })
            .collect(),
    }))
}
