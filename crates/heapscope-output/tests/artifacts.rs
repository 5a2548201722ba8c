use std::fs;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use heapscope_metrics::{MetricConfig, MetricKind, compute};
use heapscope_model::{Dataset, Event, Operation};
use heapscope_output::{OutputFormat, RenderConfig, write_artifact};

fn at(millis: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 10, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        + TimeDelta::milliseconds(millis)
}

fn mixed_log() -> Dataset {
    Dataset::new(vec![
        Event::block(at(0), Operation::Allocation, 64.0, 0.1),
        Event::block(at(700), Operation::Allocation, 256.0, 0.4),
        Event::block(at(1_200), Operation::Deallocation, 64.0, 0.2),
        Event::block(at(2_500), Operation::Allocation, 32.0, 0.3),
        Event::summary(at(3_000), 15000.0, 14000.0, "7.5", "Benchmark A"),
    ])
}

#[test]
fn every_metric_renders_as_csv_and_json() {
    let dir = tempfile::tempdir().expect("temp dir");
    let dataset = mixed_log();
    let config = MetricConfig::default();

    for format in [OutputFormat::Csv, OutputFormat::Json] {
        let render = RenderConfig::default().with_format(format);
        for kind in MetricKind::ALL {
            let artifact = compute(kind, &dataset, &config)
                .expect("compute")
                .into_computed()
                .unwrap_or_else(|| panic!("{kind} skipped"));
            let path = write_artifact(dir.path(), kind, Some("mixed"), &artifact, &render)
                .expect("write artifact");
            let text = fs::read_to_string(&path).expect("read back");
            assert!(!text.is_empty());
            if format == OutputFormat::Json {
                let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
                assert!(value.get("metric").is_some());
            }
        }
    }

    let written = fs::read_dir(dir.path()).expect("read dir").count();
    assert_eq!(written, MetricKind::ALL.len() * 2);
}

#[test]
fn memory_csv_matches_running_totals() {
    let dir = tempfile::tempdir().expect("temp dir");
    let artifact = compute(MetricKind::MemoryUsageOverTime, &mixed_log(), &MetricConfig::default())
        .expect("compute")
        .into_computed()
        .expect("computed");
    let path = write_artifact(
        dir.path(),
        MetricKind::MemoryUsageOverTime,
        None,
        &artifact,
        &RenderConfig::default(),
    )
    .expect("write");
    let text = fs::read_to_string(path).expect("read back");
    let totals: Vec<&str> = text
        .lines()
        .skip(1)
        .map(|line| line.rsplit(',').next().unwrap_or_default())
        .collect();
    assert_eq!(totals, vec!["64", "320", "256", "288"]);
}
