//! Derived metrics over normalized allocator event datasets.
//!
//! Every transform takes a [`Dataset`](heapscope_model::Dataset) by reference
//! and returns a fresh result; the dataset itself is never modified. Missing
//! or degenerate data is reported as [`MetricOutcome::Skipped`], not as an
//! error.
//!
//! - **Memory**: cumulative net allocated bytes
//! - **Rates**: operation counts per fixed-width time bucket
//! - **Latency**: raw series and rolling p50/p95/p99
//! - **Binning**: size histogram, size × time and fragmentation heatmaps
//! - **Grouping**: per-source, per-call-stack and per-size aggregates
//! - **Throughput**: summary rows as cross-run trends
//!
//! [`compute`] dispatches any [`MetricKind`] to its transform.

mod catalogue;
mod config;
mod distribution;
mod error;
mod grouped;
mod heatmap;
mod latency;
mod memory;
mod outcome;
mod rate;
mod throughput;
mod timeline;

#[cfg(test)]
mod test_support;

// === Error Types ===
pub use error::{MetricError, Result};

// === Configuration ===
pub use config::{DEFAULT_MAX_RATE_BUCKETS, MetricConfig, seconds};

// === Outcomes ===
pub use outcome::{MetricOutcome, SkipReason};

// === Catalogue ===
pub use catalogue::{MetricArtifact, MetricKind, compute};

// === Transforms ===
pub use distribution::{Histogram, size_distribution};
pub use grouped::{
    GroupedValues, SizeLatency, allocation_count_by_source, call_stack_frequency,
    mean_latency_by_block_size, mean_latency_by_source, memory_by_source,
};
pub use heatmap::{FragmentationHeatmap, SizeTimeHeatmap, fragmentation_heatmap, size_time_heatmap};
pub use latency::{
    LatencyPercentiles, LatencyPoint, LatencyTimeline, OperationLatency, PercentilePoint,
    PercentileSeries, latency_over_time, latency_percentiles, quantile_sorted,
};
pub use memory::{MemoryPoint, MemorySeries, memory_usage_over_time};
pub use rate::{OperationCounts, RateSeries, rates_over_time};
pub use throughput::{ThroughputPoint, ThroughputTrend, throughput_trends};
