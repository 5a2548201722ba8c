//! CSV reading utilities.

mod header;
mod reader;

pub use header::LogHeaders;
pub use reader::{read_log_headers, read_raw_records};
