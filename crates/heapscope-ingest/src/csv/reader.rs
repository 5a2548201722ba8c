//! CSV reading for allocator logs.
//!
//! Every column is read as text; typing happens later in
//! [`crate::normalize`], so a bad cell becomes a null instead of a failed load.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use polars::prelude::*;

use heapscope_model::{RawRecord, columns};

use crate::error::{IngestError, Result};

use super::header::{LogHeaders, parse_csv_line};

/// Reads the header row, skipping a UTF-8 BOM.
///
/// Returns `None` for a zero-byte file.
fn read_header_line(path: &Path) -> Result<Option<String>> {
    let file = File::open(path).map_err(|e| IngestError::from_io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut line = String::new();
    let read = reader.read_line(&mut line).map_err(|e| {
        if e.kind() == ErrorKind::InvalidData {
            IngestError::CsvParse {
                path: path.to_path_buf(),
                message: "header row is not valid UTF-8".to_string(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    if read == 0 {
        return Ok(None);
    }
    let cleaned = line.strip_prefix('\u{feff}').unwrap_or(&line);
    Ok(Some(cleaned.trim_end_matches(['\r', '\n']).to_string()))
}

/// Reads and checks the header row of a log file.
pub fn read_log_headers(path: &Path) -> Result<LogHeaders> {
    let Some(line) = read_header_line(path)? else {
        return Err(IngestError::EmptyInput {
            path: path.to_path_buf(),
        });
    };
    let headers = LogHeaders::new(parse_csv_line(&line));
    if headers.is_empty() {
        return Err(IngestError::EmptyInput {
            path: path.to_path_buf(),
        });
    }
    if let Some(column) = headers.missing_columns().first() {
        return Err(IngestError::MissingColumn {
            column: (*column).to_string(),
            path: path.to_path_buf(),
        });
    }
    let extra = headers.extra_columns();
    if !extra.is_empty() {
        tracing::debug!(path = %path.display(), extra = ?extra, "ignoring extra columns");
    }
    Ok(headers)
}

/// Reads a log file into a DataFrame with every column typed as text.
pub fn read_log_frame(path: &Path) -> Result<(DataFrame, LogHeaders)> {
    let headers = read_log_headers(path)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.height() == 0 {
        return Err(IngestError::EmptyInput {
            path: path.to_path_buf(),
        });
    }
    if df.width() != headers.len() {
        return Err(IngestError::CsvParse {
            path: path.to_path_buf(),
            message: format!(
                "header has {} fields but {} columns were read",
                headers.len(),
                df.width()
            ),
        });
    }

    Ok((df, headers))
}

/// Extracts one text column by header position.
fn text_column(df: &DataFrame, index: usize) -> Result<Vec<Option<String>>> {
    let column = df.get_columns()[index].cast(&DataType::String)?;
    let values = column.str()?;
    Ok(values
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

/// Converts a text DataFrame into raw records.
pub fn frame_to_records(df: &DataFrame, headers: &LogHeaders) -> Result<Vec<RawRecord>> {
    let mut records = vec![RawRecord::default(); df.height()];
    for name in columns::ALL {
        let Some(index) = headers.columns.iter().position(|c| c == name) else {
            return Err(IngestError::ColumnNotFound {
                column: name.to_string(),
            });
        };
        for (record, value) in records.iter_mut().zip(text_column(df, index)?) {
            record.set(name, value);
        }
    }
    Ok(records)
}

/// Reads a log file into raw, untyped records.
pub fn read_raw_records(path: &Path) -> Result<Vec<RawRecord>> {
    let (df, headers) = read_log_frame(path)?;
    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "read log file"
    );
    frame_to_records(&df, &headers)
}
