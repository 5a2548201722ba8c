//! Cumulative net memory over time.

use chrono::NaiveDateTime;
use serde::Serialize;

use heapscope_model::{Dataset, Operation};

use crate::error::{MetricError, Result};
use crate::outcome::MetricOutcome;
use crate::timeline::sort_by_time;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryPoint {
    pub timestamp: NaiveDateTime,
    /// `+block_size` for allocations, `-block_size` for deallocations.
    pub net_change: f64,
    /// Running sum of `net_change` up to and including this point.
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemorySeries {
    pub points: Vec<MemoryPoint>,
}

impl MemorySeries {
    pub fn totals(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.total).collect()
    }

    pub fn peak(&self) -> Option<f64> {
        self.points.iter().map(|p| p.total).reduce(f64::max)
    }
}

/// Reconstructs total allocated memory over time.
///
/// Summary rows are excluded. Any other operation than allocation or
/// deallocation fails the metric instead of being signed arbitrarily.
pub fn memory_usage_over_time(dataset: &Dataset) -> Result<MetricOutcome<MemorySeries>> {
    let mut changes = Vec::new();
    for (event, block) in dataset.blocks() {
        let net_change = match &block.operation {
            Operation::Allocation => block.block_size,
            Operation::Deallocation => -block.block_size,
            Operation::Other(label) => {
                return Err(MetricError::UnknownOperation {
                    operation: label.clone(),
                    allocation_id: block.allocation_id.clone(),
                });
            }
        };
        changes.push((event.timestamp, net_change));
    }
    if changes.is_empty() {
        return Ok(MetricOutcome::no_data());
    }

    sort_by_time(&mut changes, |(ts, _)| *ts);
    let mut total = 0.0;
    let points = changes
        .into_iter()
        .map(|(timestamp, net_change)| {
            total += net_change;
            MemoryPoint {
                timestamp,
                net_change,
                total,
            }
        })
        .collect();
    Ok(MetricOutcome::Computed(MemorySeries { points }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::at;
    use heapscope_model::Event;

    #[test]
    fn allocation_adds_deallocation_subtracts() {
        let dataset = Dataset::new(vec![
            Event::block(at(0.0), Operation::Allocation, 100.0, 0.1),
            Event::block(at(1.0), Operation::Deallocation, 40.0, 0.1),
            Event::block(at(2.0), Operation::Allocation, 10.0, 0.1),
        ]);
        let series = memory_usage_over_time(&dataset).unwrap().into_computed().unwrap();
        assert_eq!(series.totals(), vec![100.0, 60.0, 70.0]);
        assert_eq!(series.peak(), Some(100.0));
    }

    #[test]
    fn sorts_by_timestamp_before_summing() {
        let dataset = Dataset::new(vec![
            Event::block(at(2.0), Operation::Allocation, 10.0, 0.1),
            Event::block(at(0.0), Operation::Allocation, 100.0, 0.1),
            Event::block(at(1.0), Operation::Deallocation, 40.0, 0.1),
        ]);
        let series = memory_usage_over_time(&dataset).unwrap().into_computed().unwrap();
        assert_eq!(series.totals(), vec![100.0, 60.0, 70.0]);
    }

    #[test]
    fn summary_rows_are_excluded() {
        let dataset = Dataset::new(vec![
            Event::summary(at(0.0), 1000.0, 900.0, "1", "bench"),
            Event::block(at(1.0), Operation::Allocation, 8.0, 0.1),
        ]);
        let series = memory_usage_over_time(&dataset).unwrap().into_computed().unwrap();
        assert_eq!(series.points.len(), 1);
    }

    #[test]
    fn only_summaries_is_no_data() {
        let dataset = Dataset::new(vec![Event::summary(at(0.0), 1.0, 1.0, "", "")]);
        assert_eq!(
            memory_usage_over_time(&dataset).unwrap(),
            MetricOutcome::no_data()
        );
    }

    #[test]
    fn unknown_operation_fails_loudly() {
        let dataset = Dataset::new(vec![
            Event::block(at(0.0), Operation::Allocation, 8.0, 0.1),
            Event::block(at(1.0), Operation::Other("Resize".to_string()), 8.0, 0.1),
        ]);
        let err = memory_usage_over_time(&dataset).unwrap_err();
        assert!(matches!(err, MetricError::UnknownOperation { ref operation, .. } if operation == "Resize"));
    }
}
