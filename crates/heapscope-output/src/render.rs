//! Renderers turning a metric artifact into file contents.

use std::io::Write;
use std::path::Path;

use heapscope_metrics::MetricArtifact;

use crate::config::{OutputFormat, RenderConfig};
use crate::error::{OutputError, Result};
use crate::table::artifact_table;

/// Writes artifacts in one file format.
pub trait Renderer {
    /// Extension of the files this renderer produces, without the dot.
    fn extension(&self) -> &'static str;

    /// Writes `artifact` to `out`. `path` is only used in error reports.
    fn render(&self, artifact: &MetricArtifact, out: &mut dyn Write, path: &Path) -> Result<()>;
}

/// Flat CSV table per artifact.
#[derive(Debug, Clone, Default)]
pub struct CsvRenderer {
    pub float_precision: Option<usize>,
}

impl Renderer for CsvRenderer {
    fn extension(&self) -> &'static str {
        OutputFormat::Csv.extension()
    }

    fn render(&self, artifact: &MetricArtifact, out: &mut dyn Write, path: &Path) -> Result<()> {
        let csv_error = |source| OutputError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let table = artifact_table(artifact);
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(&table.headers).map_err(csv_error)?;
        for row in &table.rows {
            writer
                .write_record(row.iter().map(|cell| cell.format(self.float_precision)))
                .map_err(csv_error)?;
        }
        writer.flush().map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The artifact's serde representation as a JSON document.
#[derive(Debug, Clone, Default)]
pub struct JsonRenderer {
    pub pretty: bool,
}

impl Renderer for JsonRenderer {
    fn extension(&self) -> &'static str {
        OutputFormat::Json.extension()
    }

    fn render(&self, artifact: &MetricArtifact, out: &mut dyn Write, path: &Path) -> Result<()> {
        let written = if self.pretty {
            serde_json::to_writer_pretty(&mut *out, artifact)
        } else {
            serde_json::to_writer(&mut *out, artifact)
        };
        written.map_err(|source| OutputError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        out.write_all(b"\n").map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Renderer selected by `config.format`.
pub fn renderer_for(config: &RenderConfig) -> Box<dyn Renderer> {
    match config.format {
        OutputFormat::Csv => Box::new(CsvRenderer {
            float_precision: config.float_precision,
        }),
        OutputFormat::Json => Box::new(JsonRenderer {
            pretty: config.pretty_json,
        }),
    }
}
