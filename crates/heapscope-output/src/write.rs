//! Artifact naming and writing into an output directory.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use heapscope_metrics::{MetricArtifact, MetricKind};

use crate::config::{OutputFormat, RenderConfig};
use crate::error::{OutputError, Result};
use crate::render::renderer_for;

/// File name of one artifact: `<stem>.<ext>`, or `<base>_<stem>.<ext>` when
/// several inputs share an output directory.
pub fn artifact_file_name(kind: MetricKind, base_name: Option<&str>, format: OutputFormat) -> String {
    match base_name {
        Some(base) if !base.is_empty() => {
            format!("{base}_{}.{}", kind.file_stem(), format.extension())
        }
        _ => format!("{}.{}", kind.file_stem(), format.extension()),
    }
}

/// Creates `dir` and any missing parents.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Renders `artifact` into `dir`, returning the written path.
pub fn write_artifact(
    dir: &Path,
    kind: MetricKind,
    base_name: Option<&str>,
    artifact: &MetricArtifact,
    config: &RenderConfig,
) -> Result<PathBuf> {
    ensure_output_dir(dir)?;
    let path = dir.join(artifact_file_name(kind, base_name, config.format));
    let io_error = |source| OutputError::Write {
        path: path.clone(),
        source,
    };

    let file = File::create(&path).map_err(io_error)?;
    let mut out = BufWriter::new(file);
    renderer_for(config).render(artifact, &mut out, &path)?;
    out.flush().map_err(io_error)?;

    tracing::debug!(metric = %kind, path = %path.display(), "wrote artifact");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapscope_metrics::Histogram;

    #[test]
    fn names_follow_stem_and_format() {
        assert_eq!(
            artifact_file_name(MetricKind::MemoryUsageOverTime, None, OutputFormat::Csv),
            "memory_usage_over_time.csv"
        );
        assert_eq!(
            artifact_file_name(MetricKind::ThroughputTrends, Some("run1"), OutputFormat::Json),
            "run1_throughput_trends.json"
        );
    }

    #[test]
    fn writes_into_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("plots").join("nested");
        let artifact = MetricArtifact::SizeDistribution(Histogram {
            edges: vec![0.0, 1.0],
            counts: vec![5],
        });
        let path = write_artifact(
            &out_dir,
            MetricKind::AllocationSizeDistribution,
            None,
            &artifact,
            &RenderConfig::default(),
        )
        .unwrap();
        assert_eq!(path, out_dir.join("allocation_size_distribution.csv"));
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "bin_start,bin_end,count\n0,1,5\n");
    }

    #[test]
    fn directory_blocked_by_file_is_create_dir_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("plots");
        fs::write(&blocker, "not a directory").unwrap();
        let artifact = MetricArtifact::LatencyByBlockSize(Vec::new());
        let err = write_artifact(
            &blocker,
            MetricKind::AverageLatencyByBlockSize,
            None,
            &artifact,
            &RenderConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, OutputError::CreateDir { .. }));
    }
}
