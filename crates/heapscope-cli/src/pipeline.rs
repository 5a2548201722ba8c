//! Batch loop: load each file, compute each metric, write each artifact.
//!
//! Failures are recorded per file and per artifact; one bad input never
//! stops the rest of the batch.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{error, info, info_span, warn};

use heapscope_ingest::load_dataset;
use heapscope_metrics::{MetricKind, MetricOutcome, compute};
use heapscope_model::Dataset;
use heapscope_output::write_artifact;

use crate::config::RunOptions;
use crate::types::{ArtifactResult, ArtifactStatus, FileResult, FileStatus, RunReport};

/// Artifact name prefix for `path`: its file stem.
pub fn file_base_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string())
}

/// Artifact name prefix for each file in a batch.
///
/// A single file gets no prefix. Repeated stems (`a/run.csv`, `b/run.csv`)
/// get `_2`, `_3`, ... after the first, skipping any stem another input
/// already owns.
pub fn artifact_prefixes(files: &[PathBuf]) -> Vec<Option<String>> {
    if files.len() < 2 {
        return vec![None; files.len()];
    }
    let stems: Vec<String> = files.iter().map(|path| file_base_name(path)).collect();
    let owned: HashSet<&str> = stems.iter().map(String::as_str).collect();
    let mut used: HashSet<String> = HashSet::new();
    files
        .iter()
        .zip(&stems)
        .map(|(path, stem)| {
            if used.insert(stem.clone()) {
                return Some(stem.clone());
            }
            let prefix = (2..)
                .map(|n| format!("{stem}_{n}"))
                .find(|candidate| !owned.contains(candidate.as_str()) && !used.contains(candidate))
                .unwrap_or_else(|| stem.clone());
            warn!(path = %path.display(), prefix = %prefix, "duplicate file stem in batch");
            used.insert(prefix.clone());
            Some(prefix)
        })
        .collect()
}

/// Processes every file in order.
pub fn run_batch(files: &[PathBuf], options: &RunOptions) -> RunReport {
    let prefixes = artifact_prefixes(files);
    let results = files
        .iter()
        .zip(prefixes)
        .map(|(path, base_name)| {
            let span = info_span!("file", path = %path.display());
            let _guard = span.enter();
            FileResult {
                path: path.clone(),
                status: process_file(path, base_name.as_deref(), options),
            }
        })
        .collect();
    RunReport {
        output_dir: options.output_dir.clone(),
        files: results,
    }
}

fn process_file(path: &Path, base_name: Option<&str>, options: &RunOptions) -> FileStatus {
    let loaded = match load_dataset(path) {
        Ok(loaded) => loaded,
        Err(err) => {
            error!(error = %err, "failed to load log file");
            return FileStatus::LoadFailed {
                kind: err.kind(),
                message: err.to_string(),
            };
        }
    };
    let report = loaded.report;
    if loaded.dataset.is_empty() {
        warn!(rows_read = report.rows_read, "every row was dropped; skipping file");
        return FileStatus::Empty {
            rows_read: report.rows_read,
        };
    }
    info!(events = loaded.dataset.len(), "loaded log file");

    let artifacts = options
        .metrics
        .iter()
        .map(|&kind| ArtifactResult {
            kind,
            status: render_metric(kind, &loaded.dataset, base_name, options),
        })
        .collect();
    FileStatus::Processed {
        rows_read: report.rows_read,
        rows_kept: report.rows_kept,
        artifacts,
    }
}

fn render_metric(
    kind: MetricKind,
    dataset: &Dataset,
    base_name: Option<&str>,
    options: &RunOptions,
) -> ArtifactStatus {
    let span = info_span!("metric", metric = %kind);
    let _guard = span.enter();

    let artifact = match compute(kind, dataset, &options.metric_config) {
        Ok(MetricOutcome::Computed(artifact)) => artifact,
        Ok(MetricOutcome::Skipped(reason)) => return ArtifactStatus::Skipped(reason),
        Err(err) => {
            error!(error = %err, "metric failed");
            return ArtifactStatus::Failed(err.to_string());
        }
    };
    match write_artifact(&options.output_dir, kind, base_name, &artifact, &options.render) {
        Ok(path) => ArtifactStatus::Written(path),
        Err(err) => {
            error!(error = %err, "failed to write artifact");
            ArtifactStatus::Failed(err.to_string())
        }
    }
}
