//! Settings file and the merge of file, command-line and default values.
//!
//! Precedence is command-line flag, then settings file, then built-in
//! default.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use heapscope_metrics::{MetricConfig, MetricKind, seconds};
use heapscope_output::{OutputFormat, RenderConfig};

/// Output directory used when neither the flag nor the file sets one.
pub const DEFAULT_OUTPUT_DIR: &str = "plots";

/// Contents of a `--config` TOML file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub metrics: MetricsSection,
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsSection {
    /// Metric names to compute; all when absent.
    pub enabled: Option<Vec<String>>,
    pub bucket_width_secs: Option<f64>,
    pub percentile_window_secs: Option<f64>,
    pub size_bins: Option<usize>,
    pub heatmap_time_bins: Option<usize>,
    pub heatmap_size_bins: Option<usize>,
    pub max_rate_buckets: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub pretty_json: Option<bool>,
    pub float_precision: Option<usize>,
}

/// Reads and parses a settings file. A missing file is an error.
pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("read config file {}", path.display()))?;
    let config: FileConfig =
        toml::from_str(&content).with_context(|| format!("parse config file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Values given on the command line; `None`/empty means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub output_dir: Option<PathBuf>,
    pub metrics: Vec<MetricKind>,
    pub format: Option<OutputFormat>,
    pub bucket_width_secs: Option<f64>,
    pub window_secs: Option<f64>,
    pub pretty_json: bool,
    pub float_precision: Option<usize>,
}

/// Fully resolved settings for one `render` run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub output_dir: PathBuf,
    pub metrics: Vec<MetricKind>,
    pub metric_config: MetricConfig,
    pub render: RenderConfig,
}

/// Merges command-line values over file values over defaults.
pub fn resolve(file: &FileConfig, cli: &CliOverrides) -> Result<RunOptions> {
    let mut metric_config = MetricConfig::default();
    if let Some(width) = cli.bucket_width_secs.or(file.metrics.bucket_width_secs) {
        metric_config.bucket_width = seconds(width).context("bucket width")?;
    }
    if let Some(window) = cli.window_secs.or(file.metrics.percentile_window_secs) {
        metric_config.percentile_window = seconds(window).context("percentile window")?;
    }
    if let Some(bins) = file.metrics.size_bins {
        metric_config.size_bins = bins;
    }
    if let Some(bins) = file.metrics.heatmap_time_bins {
        metric_config.heatmap_time_bins = bins;
    }
    if let Some(bins) = file.metrics.heatmap_size_bins {
        metric_config.heatmap_size_bins = bins;
    }
    if let Some(limit) = file.metrics.max_rate_buckets {
        metric_config.max_rate_buckets = limit;
    }
    metric_config.validate().context("metric settings")?;

    let metrics = if !cli.metrics.is_empty() {
        dedup_in_order(cli.metrics.iter().copied())
    } else if let Some(names) = &file.metrics.enabled {
        let kinds = names
            .iter()
            .map(|name| name.parse::<MetricKind>().map_err(|e| anyhow!(e)))
            .collect::<Result<Vec<_>>>()
            .context("metrics.enabled")?;
        dedup_in_order(kinds)
    } else {
        MetricKind::ALL.to_vec()
    };

    let render = RenderConfig::default()
        .with_format(cli.format.or(file.output.format).unwrap_or_default())
        .with_pretty_json(cli.pretty_json || file.output.pretty_json.unwrap_or(false))
        .with_float_precision(cli.float_precision.or(file.output.float_precision));

    let output_dir = cli
        .output_dir
        .clone()
        .or_else(|| file.output.dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    Ok(RunOptions {
        output_dir,
        metrics,
        metric_config,
        render,
    })
}

fn dedup_in_order(kinds: impl IntoIterator<Item = MetricKind>) -> Vec<MetricKind> {
    let mut out: Vec<MetricKind> = Vec::new();
    for kind in kinds {
        if !out.contains(&kind) {
            out.push(kind);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file_or_flags() {
        let options = resolve(&FileConfig::default(), &CliOverrides::default()).unwrap();
        assert_eq!(options.output_dir, PathBuf::from("plots"));
        assert_eq!(options.metrics.len(), MetricKind::ALL.len());
        assert_eq!(options.metric_config, MetricConfig::default());
        assert_eq!(options.render.format, OutputFormat::Csv);
    }

    #[test]
    fn flags_beat_file_values() {
        let file: FileConfig = toml::from_str(
            r#"
            [metrics]
            bucket_width_secs = 5.0
            percentile_window_secs = 30.0
            enabled = ["throughput_trends"]

            [output]
            dir = "from-file"
            format = "json"
            "#,
        )
        .unwrap();
        let cli = CliOverrides {
            bucket_width_secs: Some(0.5),
            output_dir: Some(PathBuf::from("from-flag")),
            ..CliOverrides::default()
        };
        let options = resolve(&file, &cli).unwrap();
        assert_eq!(options.metric_config.bucket_width, seconds(0.5).unwrap());
        assert_eq!(options.metric_config.percentile_window, seconds(30.0).unwrap());
        assert_eq!(options.output_dir, PathBuf::from("from-flag"));
        assert_eq!(options.metrics, vec![MetricKind::ThroughputTrends]);
        assert_eq!(options.render.format, OutputFormat::Json);
    }

    #[test]
    fn rejects_unknown_metric_and_bad_width() {
        let file: FileConfig = toml::from_str("[metrics]\nenabled = [\"nope\"]\n").unwrap();
        assert!(resolve(&file, &CliOverrides::default()).is_err());

        let cli = CliOverrides {
            window_secs: Some(0.0),
            ..CliOverrides::default()
        };
        assert!(resolve(&FileConfig::default(), &cli).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<FileConfig>("[output]\ncolour = \"red\"\n").is_err());
    }
}
