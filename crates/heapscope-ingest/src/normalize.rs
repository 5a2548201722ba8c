//! Row normalization: typed coercion and whole-row pruning.

use chrono::NaiveDateTime;

use heapscope_model::{BlockEvent, Dataset, Event, EventKind, Operation, RawRecord, SummaryEvent};

use crate::coerce::{parse_f64, to_label, to_text};
use crate::timestamp::{TimestampStats, parse_timestamp_column};

/// Counts describing one normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    /// Rows whose timestamp failed every parse stage.
    pub bad_timestamp: usize,
    /// Rows with a null or blank operation.
    pub missing_operation: usize,
    /// Rows where `BlockSize`, `Time` or `Fragmentation` failed to coerce.
    pub bad_numeric: usize,
    pub timestamps: TimestampStats,
}

impl NormalizeReport {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.rows_kept
    }
}

/// Required fields of one row after coercion. A field is `None` when it
/// failed to coerce.
struct CoercedRow<'a> {
    timestamp: Option<NaiveDateTime>,
    operation: Option<&'a str>,
    block_size: Option<f64>,
    time: Option<f64>,
    fragmentation: Option<f64>,
}

/// Normalizes raw records into a dataset.
///
/// A row is kept only if every required field coerces; otherwise it is
/// dropped whole. Retained rows keep their input order.
pub fn normalize_records(records: &[RawRecord]) -> (Dataset, NormalizeReport) {
    let raw_timestamps: Vec<Option<&str>> =
        records.iter().map(|r| r.timestamp.as_deref()).collect();
    let (timestamps, timestamp_stats) = parse_timestamp_column(&raw_timestamps);

    let mut report = NormalizeReport {
        rows_read: records.len(),
        timestamps: timestamp_stats,
        ..NormalizeReport::default()
    };

    let mut events = Vec::with_capacity(records.len());
    for (record, timestamp) in records.iter().zip(timestamps) {
        let row = CoercedRow {
            timestamp,
            operation: to_label(record.operation.as_deref()),
            block_size: parse_f64(record.block_size.as_deref()),
            time: parse_f64(record.time.as_deref()),
            fragmentation: parse_f64(record.fragmentation.as_deref()),
        };
        if row.timestamp.is_none() {
            report.bad_timestamp += 1;
        }
        if row.operation.is_none() {
            report.missing_operation += 1;
        }
        if row.block_size.is_none() || row.time.is_none() || row.fragmentation.is_none() {
            report.bad_numeric += 1;
        }
        if let Some(event) = build_event(record, &row) {
            events.push(event);
        }
    }

    report.rows_kept = events.len();
    (Dataset::new(events), report)
}

fn build_event(record: &RawRecord, row: &CoercedRow<'_>) -> Option<Event> {
    let timestamp = row.timestamp?;
    let label = row.operation?;
    let block_size = row.block_size?;
    let time = row.time?;
    let fragmentation = row.fragmentation?;

    let memory_address = to_text(record.memory_address.as_deref());
    let thread_id = to_text(record.thread_id.as_deref());
    let allocation_id = to_text(record.allocation_id.as_deref());

    let kind = match Operation::classify(label) {
        Some(operation) => EventKind::Block(BlockEvent {
            operation,
            block_size,
            latency: time,
            fragmentation,
            memory_address,
            thread_id,
            allocation_id,
            source: to_text(record.source.as_deref()),
            call_stack: to_text(record.call_stack.as_deref()),
        }),
        None => EventKind::Summary(SummaryEvent {
            alloc_throughput: time,
            dealloc_throughput: fragmentation,
            fragmentation_text: to_text(record.source.as_deref()),
            description: to_text(record.call_stack.as_deref()),
            block_size,
            memory_address,
            thread_id,
            allocation_id,
        }),
    };
    Some(Event { timestamp, kind })
}

/// Re-normalizes an already normalized dataset.
///
/// A normalized dataset is a fixed point: the result equals the input.
pub fn renormalize(dataset: &Dataset) -> (Dataset, NormalizeReport) {
    normalize_records(&dataset.to_raw_records())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(ts: &str, op: &str, size: &str, time: &str, frag: &str, id: &str) -> RawRecord {
        RawRecord {
            timestamp: Some(ts.to_string()),
            operation: Some(op.to_string()),
            block_size: Some(size.to_string()),
            time: Some(time.to_string()),
            fragmentation: Some(frag.to_string()),
            memory_address: Some("0x10".to_string()),
            thread_id: Some("1".to_string()),
            allocation_id: Some(id.to_string()),
            source: Some("main".to_string()),
            call_stack: Some("main>alloc".to_string()),
        }
    }

    #[test]
    fn drops_rows_with_any_bad_required_field() {
        let records = vec![
            raw("2024-10-01 12:00:00", "Allocation", "64", "0.1", "0.0", "1"),
            raw("2024-10-01 12:00:01", "Allocation", "", "0.1", "0.0", "2"),
            raw("garbage", "Allocation", "64", "0.1", "0.0", "3"),
            raw("2024-10-01 12:00:02", "Deallocation", "64", "x", "0.0", "4"),
            raw("2024-10-01 12:00:03", "", "64", "0.1", "0.0", "5"),
        ];
        let (dataset, report) = normalize_records(&records);
        assert_eq!(dataset.len(), 1);
        assert_eq!(report.rows_read, 5);
        assert_eq!(report.rows_dropped(), 4);
        assert_eq!(report.bad_timestamp, 1);
        assert_eq!(report.bad_numeric, 2);
        assert_eq!(report.missing_operation, 1);
        assert_eq!(dataset.events()[0].allocation_id(), "1");
    }

    #[test]
    fn null_text_fields_become_empty() {
        let mut record = raw("2024-10-01 12:00:00", "Allocation", "64", "0.1", "0.0", "1");
        record.source = None;
        record.call_stack = None;
        let (dataset, _) = normalize_records(&[record]);
        let block = dataset.events()[0].as_block().unwrap();
        assert_eq!(block.source, "");
        assert_eq!(block.call_stack, "");
    }

    #[test]
    fn summary_rows_rename_overloaded_columns() {
        let mut record = raw("2024-10-01 12:00:00", "Summary", "0", "15000", "14000", "9");
        record.source = Some("7.5".to_string());
        record.call_stack = Some("Benchmark: mixed sizes".to_string());
        let (dataset, _) = normalize_records(&[record]);
        let summary = dataset.events()[0].as_summary().unwrap();
        assert_eq!(summary.alloc_throughput, 15000.0);
        assert_eq!(summary.dealloc_throughput, 14000.0);
        assert_eq!(summary.fragmentation_text, "7.5");
        assert_eq!(summary.description, "Benchmark: mixed sizes");
    }

    #[test]
    fn unknown_operation_is_kept_as_category() {
        let record = raw("2024-10-01 12:00:00", "Compaction", "64", "0.1", "0.0", "1");
        let (dataset, _) = normalize_records(&[record]);
        let block = dataset.events()[0].as_block().unwrap();
        assert_eq!(block.operation, Operation::Other("Compaction".to_string()));
    }

    #[test]
    fn normalization_is_idempotent() {
        let records = vec![
            raw("2024-10-01 12:00:00", "Allocation", "64", "0.1", "0.25", "1"),
            raw("2024-10-01 12:00:00.750", "Deallocation", "64", "1.5e-6", "0.0", "1"),
            raw("2024-10-01T12:00:02", "Summary", "0", "100", "90", "s"),
            raw("bad", "Allocation", "64", "0.1", "0.0", "2"),
        ];
        let (first, _) = normalize_records(&records);
        let (second, report) = renormalize(&first);
        assert_eq!(second, first);
        assert_eq!(report.rows_dropped(), 0);
    }
}
