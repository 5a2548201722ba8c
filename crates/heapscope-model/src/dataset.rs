//! Immutable collection of normalized events.

use serde::{Deserialize, Serialize};

use crate::event::{BlockEvent, Event, SummaryEvent};
use crate::operation::Operation;
use crate::record::RawRecord;

/// Events of one input file, in input order (not sorted by timestamp).
///
/// Built once by the loader and only read afterwards. Transforms that need
/// derived columns or a different order work on their own copies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    events: Vec<Event>,
}

impl Dataset {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// All non-summary events.
    pub fn blocks(&self) -> impl Iterator<Item = (&Event, &BlockEvent)> {
        self.events
            .iter()
            .filter_map(|event| event.as_block().map(|block| (event, block)))
    }

    /// Non-summary events carrying the given operation.
    pub fn blocks_with<'a>(
        &'a self,
        operation: &'a Operation,
    ) -> impl Iterator<Item = (&'a Event, &'a BlockEvent)> {
        self.blocks()
            .filter(move |(_, block)| &block.operation == operation)
    }

    /// Allocation-only events.
    pub fn allocations(&self) -> impl Iterator<Item = (&Event, &BlockEvent)> {
        self.blocks().filter(|(_, block)| block.operation.is_allocation())
    }

    pub fn summaries(&self) -> impl Iterator<Item = (&Event, &SummaryEvent)> {
        self.events
            .iter()
            .filter_map(|event| event.as_summary().map(|summary| (event, summary)))
    }

    /// A view holding only the events matching `keep`.
    pub fn filtered(&self, mut keep: impl FnMut(&Event) -> bool) -> Dataset {
        Dataset::new(self.events.iter().filter(|e| keep(e)).cloned().collect())
    }

    /// Writes every event back into the raw log schema.
    pub fn to_raw_records(&self) -> Vec<RawRecord> {
        self.events.iter().map(Event::to_raw).collect()
    }
}

impl From<Vec<Event>> for Dataset {
    fn from(events: Vec<Event>) -> Self {
        Self::new(events)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
