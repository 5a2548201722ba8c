//! Equal-width binning and the allocation size histogram.

use serde::Serialize;

use heapscope_model::Dataset;

use crate::config::nonzero_bins;
use crate::error::Result;
use crate::outcome::MetricOutcome;

/// `count` equal-width bins spanning `[lo, hi]`.
///
/// Each bin is half-open `[edge_i, edge_i+1)` except the last, which also
/// takes `hi`. A zero-width range puts every value in bin 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct EqualWidthBins {
    lo: f64,
    hi: f64,
    count: usize,
}

impl EqualWidthBins {
    pub(crate) fn new(lo: f64, hi: f64, count: usize) -> Self {
        debug_assert!(count > 0 && lo <= hi);
        Self { lo, hi, count }
    }

    /// Bins spanning the observed range of `values`, or `None` when empty.
    pub(crate) fn spanning(values: impl IntoIterator<Item = f64>, count: usize) -> Option<Self> {
        let (lo, hi) = values.into_iter().fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })?;
        Some(Self::new(lo, hi, count))
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }

    pub(crate) fn index(&self, value: f64) -> usize {
        let span = self.hi - self.lo;
        if span <= 0.0 {
            return 0;
        }
        let idx = ((value - self.lo) / span * self.count as f64).floor();
        (idx.max(0.0) as usize).min(self.count - 1)
    }

    /// `count + 1` ascending edges from `lo` to `hi`.
    pub(crate) fn edges(&self) -> Vec<f64> {
        let step = (self.hi - self.lo) / self.count as f64;
        (0..=self.count)
            .map(|i| {
                if i == self.count {
                    self.hi
                } else {
                    self.lo + step * i as f64
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// `counts.len() + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(lo, hi, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, u64)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(edge, count)| (edge[0], edge[1], *count))
    }
}

/// Histogram of allocation block sizes over `bins` equal-width bins.
///
/// Edges come from the observed min and max. A constant size is centred in
/// a unit-wide range so the histogram still has width.
pub fn size_distribution(dataset: &Dataset, bins: usize) -> Result<MetricOutcome<Histogram>> {
    let bins = nonzero_bins("size_bins", bins)?;
    let sizes: Vec<f64> = dataset.allocations().map(|(_, b)| b.block_size).collect();

    let Some(observed) = EqualWidthBins::spanning(sizes.iter().copied(), bins) else {
        tracing::info!("size distribution: no allocations");
        return Ok(MetricOutcome::no_data());
    };
    let binning = if observed.lo == observed.hi {
        EqualWidthBins::new(observed.lo - 0.5, observed.hi + 0.5, bins)
    } else {
        observed
    };

    let mut counts = vec![0u64; binning.count()];
    for size in sizes {
        counts[binning.index(size)] += 1;
    }
    Ok(MetricOutcome::Computed(Histogram {
        edges: binning.edges(),
        counts,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::at;
    use heapscope_model::{Event, Operation};

    fn alloc(size: f64) -> Event {
        Event::block(at(0.0), Operation::Allocation, size, 0.1)
    }

    #[test]
    fn maximum_lands_in_last_bin() {
        let bins = EqualWidthBins::new(0.0, 10.0, 5);
        assert_eq!(bins.index(0.0), 0);
        assert_eq!(bins.index(1.999), 0);
        assert_eq!(bins.index(2.0), 1);
        assert_eq!(bins.index(10.0), 4);
        assert_eq!(bins.edges(), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn thirty_bins_cover_every_allocation() {
        let dataset = Dataset::new((1..=100).map(|s| alloc(s as f64)).collect());
        let hist = size_distribution(&dataset, 30)
            .unwrap()
            .into_computed()
            .unwrap();
        assert_eq!(hist.counts.len(), 30);
        assert_eq!(hist.edges.len(), 31);
        assert_eq!(hist.edges[0], 1.0);
        assert_eq!(hist.edges[30], 100.0);
        assert_eq!(hist.total(), 100);
    }

    #[test]
    fn deallocations_and_summaries_are_ignored() {
        let dataset = Dataset::new(vec![
            alloc(10.0),
            alloc(20.0),
            Event::block(at(1.0), Operation::Deallocation, 5000.0, 0.1),
            Event::summary(at(2.0), 1.0, 1.0, "", ""),
        ]);
        let hist = size_distribution(&dataset, 30)
            .unwrap()
            .into_computed()
            .unwrap();
        assert_eq!(hist.total(), 2);
        assert_eq!(hist.edges[30], 20.0);
    }

    #[test]
    fn constant_size_gets_unit_range() {
        let dataset = Dataset::new(vec![alloc(64.0), alloc(64.0)]);
        let hist = size_distribution(&dataset, 30)
            .unwrap()
            .into_computed()
            .unwrap();
        assert_eq!(hist.edges[0], 63.5);
        assert_eq!(hist.edges[30], 64.5);
        assert_eq!(hist.total(), 2);
    }

    #[test]
    fn no_allocations_is_no_data() {
        let dataset = Dataset::new(vec![Event::block(
            at(0.0),
            Operation::Deallocation,
            8.0,
            0.1,
        )]);
        assert_eq!(
            size_distribution(&dataset, 30).unwrap(),
            MetricOutcome::no_data()
        );
    }
}
