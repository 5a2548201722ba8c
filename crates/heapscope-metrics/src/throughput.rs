//! Cross-run throughput trends from summary events.

use chrono::NaiveDateTime;
use serde::Serialize;

use heapscope_model::Dataset;

use crate::outcome::MetricOutcome;
use crate::timeline::sort_by_time;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThroughputPoint {
    pub timestamp: NaiveDateTime,
    pub alloc_throughput: f64,
    pub dealloc_throughput: f64,
    pub fragmentation: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThroughputTrend {
    /// Ascending by timestamp; both throughput series share these points.
    pub points: Vec<ThroughputPoint>,
}

impl ThroughputTrend {
    pub fn alloc_series(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.alloc_throughput).collect()
    }

    pub fn dealloc_series(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.dealloc_throughput).collect()
    }
}

/// Allocation and deallocation throughput of every summary event.
pub fn throughput_trends(dataset: &Dataset) -> MetricOutcome<ThroughputTrend> {
    let mut points: Vec<ThroughputPoint> = dataset
        .summaries()
        .map(|(event, summary)| ThroughputPoint {
            timestamp: event.timestamp,
            alloc_throughput: summary.alloc_throughput,
            dealloc_throughput: summary.dealloc_throughput,
            fragmentation: summary.fragmentation_text.clone(),
            description: summary.description.clone(),
        })
        .collect();
    if points.is_empty() {
        tracing::info!("throughput trends: no summary events");
        return MetricOutcome::no_data();
    }
    sort_by_time(&mut points, |p| p.timestamp);
    MetricOutcome::Computed(ThroughputTrend { points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::at;
    use heapscope_model::{Event, Operation};

    #[test]
    fn summaries_sorted_and_aligned() {
        let dataset = Dataset::new(vec![
            Event::summary(at(20.0), 12000.0, 11000.0, "8.1", "run 2"),
            Event::block(at(1.0), Operation::Allocation, 8.0, 0.1),
            Event::summary(at(10.0), 15000.0, 14000.0, "7.5", "run 1"),
        ]);
        let trend = throughput_trends(&dataset).into_computed().unwrap();
        assert_eq!(trend.alloc_series(), vec![15000.0, 12000.0]);
        assert_eq!(trend.dealloc_series(), vec![14000.0, 11000.0]);
        assert_eq!(trend.points[0].fragmentation, "7.5");
        assert_eq!(trend.points[1].description, "run 2");
    }

    #[test]
    fn no_summaries_is_no_data() {
        let dataset = Dataset::new(vec![Event::block(at(0.0), Operation::Allocation, 8.0, 0.1)]);
        assert_eq!(throughput_trends(&dataset), MetricOutcome::no_data());
    }
}
