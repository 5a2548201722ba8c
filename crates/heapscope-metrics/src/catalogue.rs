//! The fixed catalogue of metrics and a single dispatch entry point.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use heapscope_model::Dataset;

use crate::config::MetricConfig;
use crate::distribution::{Histogram, size_distribution};
use crate::error::Result;
use crate::grouped::{
    GroupedValues, SizeLatency, allocation_count_by_source, call_stack_frequency,
    mean_latency_by_block_size, mean_latency_by_source, memory_by_source,
};
use crate::heatmap::{FragmentationHeatmap, SizeTimeHeatmap, fragmentation_heatmap, size_time_heatmap};
use crate::latency::{LatencyPercentiles, LatencyTimeline, latency_over_time, latency_percentiles};
use crate::memory::{MemorySeries, memory_usage_over_time};
use crate::outcome::MetricOutcome;
use crate::rate::{RateSeries, rates_over_time};
use crate::throughput::{ThroughputTrend, throughput_trends};

/// Every metric the engine can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    MemoryUsageOverTime,
    AllocationDeallocationRates,
    AllocationLatencyOverTime,
    AllocationLatencyPercentiles,
    AllocationSizeDistribution,
    MemoryUsageBySource,
    NumberOfAllocationsBySource,
    AverageAllocationLatencyBySource,
    AllocationSizeVsTimeHeatmap,
    CallStackTraceFrequency,
    ThroughputTrends,
    AverageLatencyByBlockSize,
    FragmentationHeatmap,
}

impl MetricKind {
    /// Catalogue order; also the order artifacts are produced in.
    pub const ALL: [MetricKind; 13] = [
        MetricKind::MemoryUsageOverTime,
        MetricKind::AllocationDeallocationRates,
        MetricKind::AllocationLatencyOverTime,
        MetricKind::AllocationLatencyPercentiles,
        MetricKind::AllocationSizeDistribution,
        MetricKind::MemoryUsageBySource,
        MetricKind::NumberOfAllocationsBySource,
        MetricKind::AverageAllocationLatencyBySource,
        MetricKind::AllocationSizeVsTimeHeatmap,
        MetricKind::CallStackTraceFrequency,
        MetricKind::ThroughputTrends,
        MetricKind::AverageLatencyByBlockSize,
        MetricKind::FragmentationHeatmap,
    ];

    /// Stable name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::MemoryUsageOverTime => "memory_usage_over_time",
            MetricKind::AllocationDeallocationRates => "allocation_deallocation_rates",
            MetricKind::AllocationLatencyOverTime => "allocation_latency_over_time",
            MetricKind::AllocationLatencyPercentiles => "allocation_latency_percentiles",
            MetricKind::AllocationSizeDistribution => "allocation_size_distribution",
            MetricKind::MemoryUsageBySource => "memory_usage_by_source",
            MetricKind::NumberOfAllocationsBySource => "number_of_allocations_by_source",
            MetricKind::AverageAllocationLatencyBySource => "average_allocation_latency_by_source",
            MetricKind::AllocationSizeVsTimeHeatmap => "allocation_size_vs_time_heatmap",
            MetricKind::CallStackTraceFrequency => "call_stack_trace_frequency",
            MetricKind::ThroughputTrends => "throughput_trends",
            MetricKind::AverageLatencyByBlockSize => "average_latency_by_block_size",
            MetricKind::FragmentationHeatmap => "fragmentation_heatmap",
        }
    }

    /// File stem of the rendered artifact.
    pub fn file_stem(&self) -> &'static str {
        self.name()
    }

    pub fn description(&self) -> &'static str {
        match self {
            MetricKind::MemoryUsageOverTime => "Cumulative net allocated bytes over time",
            MetricKind::AllocationDeallocationRates => "Operations per fixed-width time bucket",
            MetricKind::AllocationLatencyOverTime => "Raw latency of each operation over time",
            MetricKind::AllocationLatencyPercentiles => {
                "Rolling p50/p95/p99 latency over a trailing window"
            }
            MetricKind::AllocationSizeDistribution => "Histogram of allocation block sizes",
            MetricKind::MemoryUsageBySource => "Total allocated bytes per source",
            MetricKind::NumberOfAllocationsBySource => "Allocation count per source",
            MetricKind::AverageAllocationLatencyBySource => "Mean allocation latency per source",
            MetricKind::AllocationSizeVsTimeHeatmap => "Allocation counts on a time x size grid",
            MetricKind::CallStackTraceFrequency => "Allocation count per call stack",
            MetricKind::ThroughputTrends => "Allocation and deallocation throughput per run",
            MetricKind::AverageLatencyByBlockSize => "Mean allocation latency per block size",
            MetricKind::FragmentationHeatmap => "Mean fragmentation per second and operation",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let name = s.trim();
        MetricKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| format!("Unknown metric: {s}"))
    }
}

/// Output of one computed metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "metric", content = "data", rename_all = "snake_case")]
pub enum MetricArtifact {
    MemoryUsage(MemorySeries),
    Rates(RateSeries),
    LatencyTimeline(LatencyTimeline),
    LatencyPercentiles(LatencyPercentiles),
    SizeDistribution(Histogram),
    /// Sum of block sizes per source.
    MemoryBySource(GroupedValues<f64>),
    AllocationsBySource(GroupedValues<u64>),
    /// Mean latency per source.
    MeanLatencyBySource(GroupedValues<f64>),
    SizeTimeHeatmap(SizeTimeHeatmap),
    CallStackFrequency(GroupedValues<u64>),
    Throughput(ThroughputTrend),
    LatencyByBlockSize(Vec<SizeLatency>),
    FragmentationHeatmap(FragmentationHeatmap),
}

/// Computes one metric over `dataset`.
pub fn compute(
    kind: MetricKind,
    dataset: &Dataset,
    config: &MetricConfig,
) -> Result<MetricOutcome<MetricArtifact>> {
    let outcome = match kind {
        MetricKind::MemoryUsageOverTime => {
            memory_usage_over_time(dataset)?.map(MetricArtifact::MemoryUsage)
        }
        MetricKind::AllocationDeallocationRates => {
            rates_over_time(dataset, config.bucket_width, config.max_rate_buckets)?.map(MetricArtifact::Rates)
        }
        MetricKind::AllocationLatencyOverTime => {
            latency_over_time(dataset).map(MetricArtifact::LatencyTimeline)
        }
        MetricKind::AllocationLatencyPercentiles => {
            latency_percentiles(dataset, config.percentile_window)?
                .map(MetricArtifact::LatencyPercentiles)
        }
        MetricKind::AllocationSizeDistribution => {
            size_distribution(dataset, config.size_bins)?.map(MetricArtifact::SizeDistribution)
        }
        MetricKind::MemoryUsageBySource => {
            memory_by_source(dataset).map(MetricArtifact::MemoryBySource)
        }
        MetricKind::NumberOfAllocationsBySource => {
            allocation_count_by_source(dataset).map(MetricArtifact::AllocationsBySource)
        }
        MetricKind::AverageAllocationLatencyBySource => {
            mean_latency_by_source(dataset).map(MetricArtifact::MeanLatencyBySource)
        }
        MetricKind::AllocationSizeVsTimeHeatmap => size_time_heatmap(
            dataset,
            config.heatmap_time_bins,
            config.heatmap_size_bins,
        )?
        .map(MetricArtifact::SizeTimeHeatmap),
        MetricKind::CallStackTraceFrequency => {
            call_stack_frequency(dataset).map(MetricArtifact::CallStackFrequency)
        }
        MetricKind::ThroughputTrends => throughput_trends(dataset).map(MetricArtifact::Throughput),
        MetricKind::AverageLatencyByBlockSize => {
            mean_latency_by_block_size(dataset).map(MetricArtifact::LatencyByBlockSize)
        }
        MetricKind::FragmentationHeatmap => {
            fragmentation_heatmap(dataset).map(MetricArtifact::FragmentationHeatmap)
        }
    };
    if let Some(reason) = outcome.skip_reason() {
        tracing::info!(metric = %kind, %reason, "metric skipped");
    }
    Ok(outcome)
}
