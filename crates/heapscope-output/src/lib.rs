//! Rendering of computed metrics into artifact files.
//!
//! Presentation is configured explicitly through [`RenderConfig`]; nothing
//! here reads global state.
//!
//! - **CSV**: each artifact flattened to one table ([`artifact_table`])
//! - **JSON**: the artifact's serde representation
//! - **Naming**: `<stem>.<ext>`, prefixed by the input's stem for batches

mod config;
mod error;
mod render;
mod table;
mod write;

pub use config::{OutputFormat, RenderConfig};
pub use error::{OutputError, Result};
pub use render::{CsvRenderer, JsonRenderer, Renderer, renderer_for};
pub use table::{Cell, Table, artifact_table};
pub use write::{artifact_file_name, ensure_output_dir, write_artifact};
