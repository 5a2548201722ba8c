//! Presentation settings passed explicitly to every renderer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Artifact file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One flat table per artifact.
    #[default]
    Csv,
    /// The artifact's full structure.
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderConfig {
    pub format: OutputFormat,
    /// Indent JSON output.
    pub pretty_json: bool,
    /// Fixed number of decimals for floats in CSV tables; `None` prints the
    /// shortest exact representation.
    pub float_precision: Option<usize>,
}

impl RenderConfig {
    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.pretty_json = pretty;
        self
    }

    #[must_use]
    pub fn with_float_precision(mut self, precision: Option<usize>) -> Self {
        self.float_precision = precision;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_format_names() {
        assert_eq!("CSV".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("png".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default().extension(), "csv");
    }
}
