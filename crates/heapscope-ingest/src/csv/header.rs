//! Header row parsing and column checks.

use heapscope_model::columns;

/// Column names found in the header row of a log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogHeaders {
    /// Trimmed column names, in file order.
    pub columns: Vec<String>,
}

impl LogHeaders {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(String::is_empty)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Log columns absent from the header, in catalogue order.
    pub fn missing_columns(&self) -> Vec<&'static str> {
        columns::ALL
            .iter()
            .copied()
            .filter(|column| !self.contains(column))
            .collect()
    }

    /// Columns the pipeline does not use.
    pub fn extra_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|column| !columns::ALL.contains(column))
            .collect()
    }
}

/// Parses one CSV line into trimmed fields, honouring double quotes.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if !in_quotes => in_quotes = true,
            '"' => {
                // "" inside quotes is a literal quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }

    fields.push(current.trim().to_string());
    fields
}
