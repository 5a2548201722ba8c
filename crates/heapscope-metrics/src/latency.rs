//! Latency series and rolling latency percentiles.

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

use heapscope_model::{Dataset, Operation};

use crate::config::positive_micros;
use crate::error::Result;
use crate::outcome::MetricOutcome;
use crate::timeline::{micros, sort_by_time};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencyPoint {
    pub timestamp: NaiveDateTime,
    pub latency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationLatency {
    pub operation: Operation,
    pub points: Vec<LatencyPoint>,
}

/// Raw latency per operation, each series in timestamp order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencyTimeline {
    /// One series per operation, in first-seen order.
    pub series: Vec<OperationLatency>,
}

/// Collects latency over time for every non-summary operation.
pub fn latency_over_time(dataset: &Dataset) -> MetricOutcome<LatencyTimeline> {
    let mut series: Vec<OperationLatency> = Vec::new();
    for (event, block) in dataset.blocks() {
        let point = LatencyPoint {
            timestamp: event.timestamp,
            latency: block.latency,
        };
        match series.iter_mut().find(|s| s.operation == block.operation) {
            Some(existing) => existing.points.push(point),
            None => series.push(OperationLatency {
                operation: block.operation.clone(),
                points: vec![point],
            }),
        }
    }
    if series.is_empty() {
        return MetricOutcome::no_data();
    }
    for s in &mut series {
        sort_by_time(&mut s.points, |p| p.timestamp);
    }
    MetricOutcome::Computed(LatencyTimeline { series })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentilePoint {
    pub timestamp: NaiveDateTime,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
    /// Number of events the percentiles were computed from.
    pub window_len: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentileSeries {
    pub operation: Operation,
    pub points: Vec<PercentilePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencyPercentiles {
    pub window_secs: f64,
    /// Allocation then deallocation; an operation with no events is absent.
    pub series: Vec<PercentileSeries>,
}

impl LatencyPercentiles {
    pub fn series_for(&self, operation: &Operation) -> Option<&PercentileSeries> {
        self.series.iter().find(|s| &s.operation == operation)
    }
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Ascending multiset of the latencies currently in the window.
#[derive(Debug, Default)]
struct SortedWindow {
    values: Vec<f64>,
}

impl SortedWindow {
    fn insert(&mut self, value: f64) {
        let idx = self
            .values
            .partition_point(|v| v.total_cmp(&value).is_lt());
        self.values.insert(idx, value);
    }

    fn remove(&mut self, value: f64) {
        if let Ok(idx) = self.values.binary_search_by(|v| v.total_cmp(&value)) {
            self.values.remove(idx);
        }
    }
}

/// Rolling p50/p95/p99 for one operation's `(timestamp, latency)` pairs.
///
/// Input must be in timestamp order. At row `i` the window holds rows
/// `j <= i` with `ts_j > ts_i - window`; later rows never contribute.
fn rolling_percentiles(points: &[(NaiveDateTime, f64)], window_us: i64) -> Vec<PercentilePoint> {
    let mut window = SortedWindow::default();
    let mut left = 0usize;
    let mut out = Vec::with_capacity(points.len());

    for (i, &(timestamp, latency)) in points.iter().enumerate() {
        window.insert(latency);
        let now = micros(timestamp);
        while left < i && now - micros(points[left].0) >= window_us {
            window.remove(points[left].1);
            left += 1;
        }
        out.push(PercentilePoint {
            timestamp,
            p50: quantile_sorted(&window.values, 0.50),
            p95: quantile_sorted(&window.values, 0.95),
            p99: quantile_sorted(&window.values, 0.99),
            window_len: window.values.len(),
        });
    }
    out
}

/// Rolling latency percentiles for allocations and deallocations.
pub fn latency_percentiles(
    dataset: &Dataset,
    window: TimeDelta,
) -> Result<MetricOutcome<LatencyPercentiles>> {
    let window_us = positive_micros("percentile_window", window)?;

    let mut series = Vec::new();
    for operation in [Operation::Allocation, Operation::Deallocation] {
        let mut points: Vec<(NaiveDateTime, f64)> = dataset
            .blocks_with(&operation)
            .map(|(event, block)| (event.timestamp, block.latency))
            .collect();
        if points.is_empty() {
            tracing::info!(%operation, "latency percentiles: no events");
            continue;
        }
        sort_by_time(&mut points, |(ts, _)| *ts);
        series.push(PercentileSeries {
            points: rolling_percentiles(&points, window_us),
            operation,
        });
    }

    if series.is_empty() {
        return Ok(MetricOutcome::no_data());
    }
    Ok(MetricOutcome::Computed(LatencyPercentiles {
        window_secs: window_us as f64 / 1_000_000.0,
        series,
    }))
}
