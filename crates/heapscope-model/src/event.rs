//! Normalized allocator events.
//!
//! Block rows and summary rows share the log schema but not its meaning:
//! summary rows reuse `Time`, `Fragmentation`, `Source` and `CallStack` for
//! throughput figures and benchmark text. The two are modelled as separate
//! variants behind a common envelope (timestamp + tag), and the column reuse
//! is resolved once, by name, when the variant is built.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::operation::{Operation, SUMMARY_LABEL};
use crate::record::RawRecord;

/// Format used when an event is written back out as text.
///
/// `%.f` prints nothing for whole seconds, so the output parses with either of
/// the two fixed log formats.
pub const TIMESTAMP_OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// One normalized log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: NaiveDateTime,
    pub kind: EventKind,
}

/// Variant tag of an [`Event`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    Block(BlockEvent),
    Summary(SummaryEvent),
}

/// Allocation, deallocation, or other block-level operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockEvent {
    pub operation: Operation,
    pub block_size: f64,
    /// Operation latency in seconds (`Time` column).
    pub latency: f64,
    pub fragmentation: f64,
    pub memory_address: String,
    pub thread_id: String,
    /// Count proxy only; never dereferenced.
    pub allocation_id: String,
    pub source: String,
    pub call_stack: String,
}

/// Periodic benchmark summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEvent {
    /// Carried in the `Time` column.
    pub alloc_throughput: f64,
    /// Carried in the `Fragmentation` column.
    pub dealloc_throughput: f64,
    /// Carried in the `Source` column.
    pub fragmentation_text: String,
    /// Carried in the `CallStack` column.
    pub description: String,
    pub block_size: f64,
    pub memory_address: String,
    pub thread_id: String,
    pub allocation_id: String,
}

impl Event {
    /// Creates a block event with empty identifier fields.
    pub fn block(timestamp: NaiveDateTime, operation: Operation, block_size: f64, latency: f64) -> Self {
        Self {
            timestamp,
            kind: EventKind::Block(BlockEvent {
                operation,
                block_size,
                latency,
                fragmentation: 0.0,
                memory_address: String::new(),
                thread_id: String::new(),
                allocation_id: String::new(),
                source: String::new(),
                call_stack: String::new(),
            }),
        }
    }

    /// Creates a summary event with empty identifier fields.
    pub fn summary(
        timestamp: NaiveDateTime,
        alloc_throughput: f64,
        dealloc_throughput: f64,
        fragmentation_text: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            kind: EventKind::Summary(SummaryEvent {
                alloc_throughput,
                dealloc_throughput,
                fragmentation_text: fragmentation_text.into(),
                description: description.into(),
                block_size: 0.0,
                memory_address: String::new(),
                thread_id: String::new(),
                allocation_id: String::new(),
            }),
        }
    }

    /// Returns the block payload, or `None` for summary rows.
    pub fn as_block(&self) -> Option<&BlockEvent> {
        match &self.kind {
            EventKind::Block(block) => Some(block),
            EventKind::Summary(_) => None,
        }
    }

    pub fn as_summary(&self) -> Option<&SummaryEvent> {
        match &self.kind {
            EventKind::Summary(summary) => Some(summary),
            EventKind::Block(_) => None,
        }
    }

    pub fn is_summary(&self) -> bool {
        matches!(self.kind, EventKind::Summary(_))
    }

    /// Operation label as written in the log.
    pub fn operation_label(&self) -> &str {
        match &self.kind {
            EventKind::Block(block) => block.operation.as_str(),
            EventKind::Summary(_) => SUMMARY_LABEL,
        }
    }

    pub fn allocation_id(&self) -> &str {
        match &self.kind {
            EventKind::Block(block) => &block.allocation_id,
            EventKind::Summary(summary) => &summary.allocation_id,
        }
    }

    /// Writes the event back into the shared log schema.
    ///
    /// Summary fields go back into the columns they were read from.
    pub fn to_raw(&self) -> RawRecord {
        let timestamp = Some(self.timestamp.format(TIMESTAMP_OUTPUT_FORMAT).to_string());
        match &self.kind {
            EventKind::Block(block) => RawRecord {
                timestamp,
                operation: Some(block.operation.as_str().to_string()),
                block_size: Some(block.block_size.to_string()),
                time: Some(block.latency.to_string()),
                fragmentation: Some(block.fragmentation.to_string()),
                memory_address: Some(block.memory_address.clone()),
                thread_id: Some(block.thread_id.clone()),
                allocation_id: Some(block.allocation_id.clone()),
                source: Some(block.source.clone()),
                call_stack: Some(block.call_stack.clone()),
            },
            EventKind::Summary(summary) => RawRecord {
                timestamp,
                operation: Some(SUMMARY_LABEL.to_string()),
                block_size: Some(summary.block_size.to_string()),
                time: Some(summary.alloc_throughput.to_string()),
                fragmentation: Some(summary.dealloc_throughput.to_string()),
                memory_address: Some(summary.memory_address.clone()),
                thread_id: Some(summary.thread_id.clone()),
                allocation_id: Some(summary.allocation_id.clone()),
                source: Some(summary.fragmentation_text.clone()),
                call_stack: Some(summary.description.clone()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 10, 1)
            .unwrap()
            .and_hms_milli_opt(12, 0, 0, 250)
            .unwrap()
    }

    #[test]
    fn summary_fields_return_to_their_columns() {
        let event = Event::summary(ts(), 1500.0, 1400.0, "12.5%", "run 3");
        let raw = event.to_raw();
        assert_eq!(raw.operation.as_deref(), Some("Summary"));
        assert_eq!(raw.time.as_deref(), Some("1500"));
        assert_eq!(raw.fragmentation.as_deref(), Some("1400"));
        assert_eq!(raw.source.as_deref(), Some("12.5%"));
        assert_eq!(raw.call_stack.as_deref(), Some("run 3"));
        assert_eq!(raw.timestamp.as_deref(), Some("2024-10-01 12:00:00.250"));
    }

    #[test]
    fn whole_second_timestamps_have_no_fraction() {
        let whole = NaiveDate::from_ymd_opt(2024, 10, 1)
            .unwrap()
            .and_hms_opt(8, 30, 5)
            .unwrap();
        let raw = Event::block(whole, Operation::Allocation, 64.0, 0.001).to_raw();
        assert_eq!(raw.timestamp.as_deref(), Some("2024-10-01 08:30:05"));
    }

    #[test]
    fn label_and_payload_accessors() {
        let block = Event::block(ts(), Operation::Deallocation, 32.0, 0.5);
        assert_eq!(block.operation_label(), "Deallocation");
        assert!(block.as_block().is_some());
        assert!(block.as_summary().is_none());

        let summary = Event::summary(ts(), 1.0, 2.0, "", "");
        assert!(summary.is_summary());
        assert_eq!(summary.operation_label(), "Summary");
    }
}
