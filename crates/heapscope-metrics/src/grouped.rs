//! Aggregates of allocation events grouped by a key column.

use std::collections::BTreeMap;

use serde::Serialize;

use heapscope_model::{BlockEvent, Dataset};

use crate::outcome::MetricOutcome;

/// One value per distinct observed key.
pub type GroupedValues<T> = BTreeMap<String, T>;

#[derive(Debug, Default, Clone, Copy)]
struct MeanAccumulator {
    sum: f64,
    count: u64,
}

impl MeanAccumulator {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(self) -> f64 {
        self.sum / self.count as f64
    }
}

fn group_allocations<T: Default>(
    dataset: &Dataset,
    key: impl Fn(&BlockEvent) -> &str,
    mut fold: impl FnMut(&mut T, &BlockEvent),
) -> MetricOutcome<GroupedValues<T>> {
    let mut groups: GroupedValues<T> = BTreeMap::new();
    for (_, block) in dataset.allocations() {
        fold(groups.entry(key(block).to_string()).or_default(), block);
    }
    if groups.is_empty() {
        return MetricOutcome::no_data();
    }
    MetricOutcome::Computed(groups)
}

/// Total allocated bytes per source.
pub fn memory_by_source(dataset: &Dataset) -> MetricOutcome<GroupedValues<f64>> {
    group_allocations::<f64>(dataset, |b| b.source.as_str(), |sum, b| *sum += b.block_size)
}

/// Number of allocations per source.
pub fn allocation_count_by_source(dataset: &Dataset) -> MetricOutcome<GroupedValues<u64>> {
    group_allocations::<u64>(dataset, |b| b.source.as_str(), |count, _| *count += 1)
}

/// Mean allocation latency per source.
pub fn mean_latency_by_source(dataset: &Dataset) -> MetricOutcome<GroupedValues<f64>> {
    group_allocations::<MeanAccumulator>(dataset, |b| b.source.as_str(), |acc, b| acc.push(b.latency))
        .map(|groups| groups.into_iter().map(|(k, acc)| (k, acc.mean())).collect())
}

/// Number of allocations per call stack.
pub fn call_stack_frequency(dataset: &Dataset) -> MetricOutcome<GroupedValues<u64>> {
    group_allocations::<u64>(dataset, |b| b.call_stack.as_str(), |count, _| *count += 1)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeLatency {
    pub block_size: f64,
    pub mean_latency: f64,
    pub count: u64,
}

/// Mean allocation latency per exact block size, ascending by size.
pub fn mean_latency_by_block_size(dataset: &Dataset) -> MetricOutcome<Vec<SizeLatency>> {
    let mut sizes: Vec<(f64, f64)> = dataset
        .allocations()
        .map(|(_, b)| (b.block_size, b.latency))
        .collect();
    if sizes.is_empty() {
        return MetricOutcome::no_data();
    }
    sizes.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut out: Vec<SizeLatency> = Vec::new();
    let mut acc = MeanAccumulator::default();
    let mut current = sizes[0].0;
    for (size, latency) in sizes {
        if size != current {
            out.push(SizeLatency {
                block_size: current,
                mean_latency: acc.mean(),
                count: acc.count,
            });
            acc = MeanAccumulator::default();
            current = size;
        }
        acc.push(latency);
    }
    out.push(SizeLatency {
        block_size: current,
        mean_latency: acc.mean(),
        count: acc.count,
    });
    MetricOutcome::Computed(out)
}
