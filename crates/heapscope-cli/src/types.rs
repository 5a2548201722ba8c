use std::path::PathBuf;

use heapscope_ingest::IngestErrorKind;
use heapscope_metrics::{MetricKind, SkipReason};

/// What happened to one metric of one file.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactStatus {
    Written(PathBuf),
    Skipped(SkipReason),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactResult {
    pub kind: MetricKind,
    pub status: ArtifactStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    /// Loaded with at least one event; every requested metric was attempted.
    Processed {
        rows_read: usize,
        rows_kept: usize,
        artifacts: Vec<ArtifactResult>,
    },
    /// Loaded, but every row was pruned.
    Empty { rows_read: usize },
    LoadFailed {
        kind: IngestErrorKind,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileResult {
    pub path: PathBuf,
    pub status: FileStatus,
}

impl FileResult {
    pub fn artifacts(&self) -> &[ArtifactResult] {
        match &self.status {
            FileStatus::Processed { artifacts, .. } => artifacts,
            _ => &[],
        }
    }

    pub fn count(&self, matches: impl Fn(&ArtifactStatus) -> bool) -> usize {
        self.artifacts().iter().filter(|a| matches(&a.status)).count()
    }

    pub fn has_errors(&self) -> bool {
        matches!(self.status, FileStatus::LoadFailed { .. })
            || self.count(|s| matches!(s, ArtifactStatus::Failed(_))) > 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub output_dir: PathBuf,
    pub files: Vec<FileResult>,
}

impl RunReport {
    /// True when any file failed to load or any artifact failed.
    pub fn has_errors(&self) -> bool {
        self.files.iter().any(FileResult::has_errors)
    }

    pub fn exit_code(&self) -> i32 {
        i32::from(self.has_errors())
    }
}
