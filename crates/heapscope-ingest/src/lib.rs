//! Allocator log ingestion.
//!
//! Reads a row-oriented log file into a normalized [`Dataset`]:
//!
//! - **CSV loading**: every column read as text through Polars
//! - **Timestamps**: staged parsing (whole seconds, sub-second, inferred)
//! - **Coercion**: numeric and text columns coerced to their canonical types
//! - **Pruning**: rows with any failed required field are dropped whole
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use heapscope_ingest::load_dataset;
//!
//! let loaded = load_dataset(Path::new("allocator_tests_data.csv"))?;
//! println!("{} events ({} dropped)", loaded.dataset.len(), loaded.report.rows_dropped());
//! ```

mod coerce;
mod csv;
mod error;
mod normalize;
mod timestamp;

use std::path::Path;

use heapscope_model::Dataset;

// === Error Types ===
pub use error::{IngestError, IngestErrorKind, Result};

// === CSV Reading ===
pub use csv::{LogHeaders, read_log_headers, read_raw_records};

// === Normalization ===
pub use coerce::parse_f64;
pub use normalize::{NormalizeReport, normalize_records, renormalize};
pub use timestamp::{
    ParseStage, SECONDS_FORMAT, SUBSECOND_FORMAT, TimestampStats, parse_timestamp,
    parse_timestamp_column,
};

/// A normalized dataset plus the counts from normalizing it.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub report: NormalizeReport,
}

/// Loads and normalizes one log file.
///
/// Reads the file only; nothing is written.
pub fn load_dataset(path: &Path) -> Result<LoadedDataset> {
    let records = read_raw_records(path)?;
    let (dataset, report) = normalize_records(&records);

    tracing::debug!(
        path = %path.display(),
        rows_read = report.rows_read,
        rows_kept = report.rows_kept,
        inferred_timestamps = report.timestamps.inferred,
        "normalized log file"
    );
    if report.rows_dropped() > 0 {
        tracing::info!(
            path = %path.display(),
            dropped = report.rows_dropped(),
            bad_timestamp = report.bad_timestamp,
            bad_numeric = report.bad_numeric,
            missing_operation = report.missing_operation,
            "dropped rows that failed coercion"
        );
    }

    Ok(LoadedDataset { dataset, report })
}
