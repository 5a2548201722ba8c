//! Data model for allocator event logs.
//!
//! - **record**: raw, untyped rows and the log's column catalogue
//! - **operation**: block operation tags
//! - **event**: normalized events (block and summary variants)
//! - **dataset**: the immutable per-file event collection

pub mod dataset;
pub mod event;
pub mod operation;
pub mod record;

pub use dataset::Dataset;
pub use event::{BlockEvent, Event, EventKind, SummaryEvent, TIMESTAMP_OUTPUT_FORMAT};
pub use operation::{Operation, SUMMARY_LABEL};
pub use record::{RawRecord, columns};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn dataset_serializes() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let dataset = Dataset::new(vec![
            Event::block(ts, Operation::Allocation, 128.0, 0.002),
            Event::summary(ts, 2000.0, 1900.0, "3.2%", "baseline"),
        ]);
        let json = serde_json::to_string(&dataset).expect("serialize dataset");
        let round: Dataset = serde_json::from_str(&json).expect("deserialize dataset");
        assert_eq!(round, dataset);
    }
}
