//! Flattening of metric artifacts into rectangular tables.

use chrono::NaiveDateTime;

use heapscope_metrics::{GroupedValues, MetricArtifact};
use heapscope_model::TIMESTAMP_OUTPUT_FORMAT;

/// One table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Float(f64),
    Count(u64),
    Time(NaiveDateTime),
}

impl Cell {
    /// Renders the cell; `precision` fixes the decimals of floats.
    pub fn format(&self, precision: Option<usize>) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Float(value) => match precision {
                Some(digits) => format!("{value:.digits$}"),
                None => value.to_string(),
            },
            Cell::Count(value) => value.to_string(),
            Cell::Time(ts) => ts.format(TIMESTAMP_OUTPUT_FORMAT).to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        Cell::Count(value)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(value: NaiveDateTime) -> Self {
        Cell::Time(value)
    }
}

/// Header plus rows; every row has `headers.len()` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.headers.len());
        self.rows.push(row);
    }
}

fn grouped<T: Copy + Into<Cell>>(key: &str, value: &str, groups: &GroupedValues<T>) -> Table {
    let mut table = Table::new([key, value]);
    for (group, v) in groups {
        table.push(vec![group.as_str().into(), (*v).into()]);
    }
    table
}

/// Flattens an artifact into a table. Wide layouts keep one column per
/// operation; everything else is long format.
pub fn artifact_table(artifact: &MetricArtifact) -> Table {
    match artifact {
        MetricArtifact::MemoryUsage(series) => {
            let mut table = Table::new(["timestamp", "net_change", "total_memory"]);
            for p in &series.points {
                table.push(vec![p.timestamp.into(), p.net_change.into(), p.total.into()]);
            }
            table
        }
        MetricArtifact::Rates(series) => {
            let mut table = Table::new(
                std::iter::once("bucket_start".to_string())
                    .chain(series.operations.iter().map(|c| c.operation.to_string())),
            );
            for (idx, start) in series.bucket_starts.iter().enumerate() {
                let mut row = vec![Cell::Time(*start)];
                row.extend(series.operations.iter().map(|c| Cell::Count(c.counts[idx])));
                table.push(row);
            }
            table
        }
        MetricArtifact::LatencyTimeline(timeline) => {
            let mut table = Table::new(["operation", "timestamp", "latency"]);
            for s in &timeline.series {
                for p in &s.points {
                    table.push(vec![
                        s.operation.as_str().into(),
                        p.timestamp.into(),
                        p.latency.into(),
                    ]);
                }
            }
            table
        }
        MetricArtifact::LatencyPercentiles(percentiles) => {
            let mut table =
                Table::new(["operation", "timestamp", "p50", "p95", "p99", "window_len"]);
            for s in &percentiles.series {
                for p in &s.points {
                    table.push(vec![
                        s.operation.as_str().into(),
                        p.timestamp.into(),
                        p.p50.into(),
                        p.p95.into(),
                        p.p99.into(),
                        (p.window_len as u64).into(),
                    ]);
                }
            }
            table
        }
        MetricArtifact::SizeDistribution(hist) => {
            let mut table = Table::new(["bin_start", "bin_end", "count"]);
            for (lo, hi, count) in hist.bins() {
                table.push(vec![lo.into(), hi.into(), count.into()]);
            }
            table
        }
        MetricArtifact::MemoryBySource(groups) => grouped("source", "total_block_size", groups),
        MetricArtifact::AllocationsBySource(groups) => grouped("source", "allocations", groups),
        MetricArtifact::MeanLatencyBySource(groups) => grouped("source", "mean_latency", groups),
        MetricArtifact::CallStackFrequency(groups) => grouped("call_stack", "allocations", groups),
        MetricArtifact::SizeTimeHeatmap(heatmap) => {
            let mut table = Table::new(["time_bin_start", "size_bin_start", "size_bin_end", "count"]);
            for (size_idx, row) in heatmap.counts.iter().enumerate() {
                for (time_idx, count) in row.iter().enumerate() {
                    table.push(vec![
                        heatmap.time_edges[time_idx].into(),
                        heatmap.size_edges[size_idx].into(),
                        heatmap.size_edges[size_idx + 1].into(),
                        (*count).into(),
                    ]);
                }
            }
            table
        }
        MetricArtifact::Throughput(trend) => {
            let mut table = Table::new([
                "timestamp",
                "alloc_throughput",
                "dealloc_throughput",
                "fragmentation",
                "description",
            ]);
            for p in &trend.points {
                table.push(vec![
                    p.timestamp.into(),
                    p.alloc_throughput.into(),
                    p.dealloc_throughput.into(),
                    p.fragmentation.as_str().into(),
                    p.description.as_str().into(),
                ]);
            }
            table
        }
        MetricArtifact::LatencyByBlockSize(rows) => {
            let mut table = Table::new(["block_size", "mean_latency", "allocations"]);
            for r in rows {
                table.push(vec![r.block_size.into(), r.mean_latency.into(), r.count.into()]);
            }
            table
        }
        MetricArtifact::FragmentationHeatmap(heatmap) => {
            let mut table = Table::new(
                std::iter::once("second".to_string())
                    .chain(heatmap.operations.iter().map(ToString::to_string)),
            );
            for (col, second) in heatmap.seconds.iter().enumerate() {
                let mut row = vec![Cell::Time(*second)];
                row.extend(heatmap.values.iter().map(|values| Cell::Float(values[col])));
                table.push(row);
            }
            table
        }
    }
}
