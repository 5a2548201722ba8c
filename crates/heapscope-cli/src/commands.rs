use std::fs;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span};

use heapscope_cli::config::{CliOverrides, FileConfig, load_file_config, resolve};
use heapscope_cli::pipeline::run_batch;
use heapscope_cli::types::RunReport;
use heapscope_metrics::MetricKind;
use heapscope_output::OutputFormat;

use crate::cli::{OutputFormatArg, RenderArgs};
use crate::summary::apply_table_style;

pub fn run_metrics() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Artifact", "Description"]);
    apply_table_style(&mut table);
    for kind in MetricKind::ALL {
        table.add_row(vec![
            kind.name().to_string(),
            format!("{}.<csv|json>", kind.file_stem()),
            kind.description().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_render(args: &RenderArgs) -> Result<RunReport> {
    let file_config = match &args.config {
        Some(path) => load_file_config(path)?,
        None => FileConfig::default(),
    };
    let overrides = CliOverrides {
        output_dir: args.output_dir.clone(),
        metrics: args.metrics.clone(),
        format: args.format.map(|format| match format {
            OutputFormatArg::Csv => OutputFormat::Csv,
            OutputFormatArg::Json => OutputFormat::Json,
        }),
        bucket_width_secs: args.bucket_width,
        window_secs: args.window,
        pretty_json: args.pretty,
        float_precision: args.precision,
    };
    let options = resolve(&file_config, &overrides)?;

    let span = info_span!("render", files = args.files.len(), output_dir = %options.output_dir.display());
    let _guard = span.enter();
    fs::create_dir_all(&options.output_dir)
        .with_context(|| format!("create {}", options.output_dir.display()))?;
    info!(metrics = options.metrics.len(), format = %options.render.format, "starting batch");

    Ok(run_batch(&args.files, &options))
}
