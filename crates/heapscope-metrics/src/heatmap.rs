//! Two-dimensional binning: size-vs-time counts and fragmentation by second.

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

use heapscope_model::{Dataset, Operation};

use crate::config::nonzero_bins;
use crate::distribution::EqualWidthBins;
use crate::error::Result;
use crate::outcome::MetricOutcome;
use crate::timeline::{micros, offset_micros};

/// Allocation counts on an equal-width time × size grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeTimeHeatmap {
    /// `time_bins + 1` edges.
    pub time_edges: Vec<NaiveDateTime>,
    /// `size_bins + 1` edges.
    pub size_edges: Vec<f64>,
    /// `counts[size_bin][time_bin]`; empty cells are 0.
    pub counts: Vec<Vec<u64>>,
    pub total: u64,
}

impl SizeTimeHeatmap {
    pub fn cell_sum(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }
}

/// Bins allocations by timestamp and block size.
///
/// Each axis spans its own observed range. A grid with fewer than two
/// occupied rows or columns is reported as insufficient variation.
pub fn size_time_heatmap(
    dataset: &Dataset,
    time_bins: usize,
    size_bins: usize,
) -> Result<MetricOutcome<SizeTimeHeatmap>> {
    let time_bins = nonzero_bins("heatmap_time_bins", time_bins)?;
    let size_bins = nonzero_bins("heatmap_size_bins", size_bins)?;

    let points: Vec<(NaiveDateTime, f64)> = dataset
        .allocations()
        .map(|(event, block)| (event.timestamp, block.block_size))
        .collect();
    let Some(first) = points.iter().map(|(ts, _)| *ts).min() else {
        tracing::info!("size/time heatmap: no allocations");
        return Ok(MetricOutcome::no_data());
    };

    // Time is binned as microseconds relative to the earliest allocation.
    let origin = micros(first);
    let offsets: Vec<f64> = points
        .iter()
        .map(|(ts, _)| (micros(*ts) - origin) as f64)
        .collect();
    let (Some(time_axis), Some(size_axis)) = (
        EqualWidthBins::spanning(offsets.iter().copied(), time_bins),
        EqualWidthBins::spanning(points.iter().map(|(_, size)| *size), size_bins),
    ) else {
        return Ok(MetricOutcome::no_data());
    };

    let mut counts = vec![vec![0u64; time_bins]; size_bins];
    for (offset, (_, size)) in offsets.iter().zip(&points) {
        counts[size_axis.index(*size)][time_axis.index(*offset)] += 1;
    }

    let occupied_rows = counts.iter().filter(|row| row.iter().any(|&c| c > 0)).count();
    let occupied_cols = (0..time_bins)
        .filter(|&col| counts.iter().any(|row| row[col] > 0))
        .count();
    if occupied_rows < 2 || occupied_cols < 2 {
        tracing::info!(
            occupied_rows,
            occupied_cols,
            "size/time heatmap: insufficient variation"
        );
        return Ok(MetricOutcome::insufficient_variation());
    }

    Ok(MetricOutcome::Computed(SizeTimeHeatmap {
        time_edges: time_axis
            .edges()
            .into_iter()
            .map(|edge| offset_micros(first, edge.round() as i64))
            .collect(),
        size_edges: size_axis.edges(),
        total: points.len() as u64,
        counts,
    }))
}

/// Mean fragmentation per (second, operation) cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FragmentationHeatmap {
    /// Distinct observed seconds, ascending.
    pub seconds: Vec<NaiveDateTime>,
    pub operations: Vec<Operation>,
    /// `values[operation][second]`; cells with no events are 0.
    pub values: Vec<Vec<f64>>,
}

/// Averages fragmentation over non-summary events by whole second and
/// operation.
pub fn fragmentation_heatmap(dataset: &Dataset) -> MetricOutcome<FragmentationHeatmap> {
    let mut cells: BTreeMap<(&Operation, NaiveDateTime), (f64, u64)> = BTreeMap::new();
    for (event, block) in dataset.blocks() {
        let second = event.timestamp.with_nanosecond(0).unwrap_or(event.timestamp);
        let cell = cells.entry((&block.operation, second)).or_default();
        cell.0 += block.fragmentation;
        cell.1 += 1;
    }
    if cells.is_empty() {
        return MetricOutcome::no_data();
    }

    let mut operations: Vec<Operation> = cells.keys().map(|(op, _)| (*op).clone()).collect();
    operations.dedup();
    let mut seconds: Vec<NaiveDateTime> = cells.keys().map(|(_, s)| *s).collect();
    seconds.sort_unstable();
    seconds.dedup();

    let mut values = vec![vec![0.0; seconds.len()]; operations.len()];
    for ((operation, second), (sum, count)) in &cells {
        let row = operations.iter().position(|op| op == *operation);
        let col = seconds.binary_search(second).ok();
        if let (Some(row), Some(col)) = (row, col) {
            values[row][col] = sum / *count as f64;
        }
    }
    MetricOutcome::Computed(FragmentationHeatmap {
        seconds,
        operations,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::at;
    use heapscope_model::{Event, EventKind};

    fn alloc(secs: f64, size: f64) -> Event {
        Event::block(at(secs), Operation::Allocation, size, 0.1)
    }

    fn with_fragmentation(mut event: Event, fragmentation: f64) -> Event {
        if let EventKind::Block(block) = &mut event.kind {
            block.fragmentation = fragmentation;
        }
        event
    }

    #[test]
    fn corners_of_the_range_land_in_corner_cells() {
        let dataset = Dataset::new(vec![alloc(0.0, 8.0), alloc(10.0, 1024.0), alloc(5.0, 512.0)]);
        let heatmap = size_time_heatmap(&dataset, 50, 50)
            .unwrap()
            .into_computed()
            .unwrap();
        assert_eq!(heatmap.counts.len(), 50);
        assert_eq!(heatmap.counts[0].len(), 50);
        assert_eq!(heatmap.counts[0][0], 1);
        assert_eq!(heatmap.counts[49][49], 1);
        assert_eq!(heatmap.cell_sum(), 3);
        assert_eq!(heatmap.time_edges.first(), Some(&at(0.0)));
        assert_eq!(heatmap.time_edges.last(), Some(&at(10.0)));
    }

    #[test]
    fn single_timestamp_is_insufficient() {
        let dataset = Dataset::new(vec![alloc(1.0, 8.0), alloc(1.0, 64.0)]);
        assert_eq!(
            size_time_heatmap(&dataset, 50, 50).unwrap(),
            MetricOutcome::insufficient_variation()
        );
    }

    #[test]
    fn single_size_is_insufficient() {
        let dataset = Dataset::new(vec![alloc(0.0, 8.0), alloc(3.0, 8.0)]);
        assert_eq!(
            size_time_heatmap(&dataset, 50, 50).unwrap(),
            MetricOutcome::insufficient_variation()
        );
    }

    #[test]
    fn heatmap_without_allocations_is_no_data() {
        let dataset = Dataset::new(vec![Event::block(at(0.0), Operation::Deallocation, 8.0, 0.1)]);
        assert_eq!(
            size_time_heatmap(&dataset, 50, 50).unwrap(),
            MetricOutcome::no_data()
        );
    }

    #[test]
    fn fragmentation_is_averaged_per_second_and_operation() {
        let dataset = Dataset::new(vec![
            with_fragmentation(alloc(0.2, 8.0), 0.1),
            with_fragmentation(alloc(0.8, 8.0), 0.3),
            with_fragmentation(
                Event::block(at(1.5), Operation::Deallocation, 8.0, 0.1),
                0.5,
            ),
            Event::summary(at(1.0), 100.0, 90.0, "9.9", "bench"),
        ]);
        let heatmap = fragmentation_heatmap(&dataset).into_computed().unwrap();
        assert_eq!(heatmap.seconds, vec![at(0.0), at(1.0)]);
        assert_eq!(
            heatmap.operations,
            vec![Operation::Allocation, Operation::Deallocation]
        );
        assert!((heatmap.values[0][0] - 0.2).abs() < 1e-12);
        assert_eq!(heatmap.values[0][1], 0.0);
        assert_eq!(heatmap.values[1][1], 0.5);
    }
}
