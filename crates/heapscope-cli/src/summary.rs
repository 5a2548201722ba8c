use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use heapscope_cli::types::{ArtifactStatus, FileResult, FileStatus, RunReport};
use heapscope_ingest::IngestErrorKind;

pub fn print_summary(report: &RunReport) {
    println!("Output: {}", report.output_dir.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Rows"),
        header_cell("Kept"),
        header_cell("Written"),
        header_cell("Skipped"),
        header_cell("Failed"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total_written = 0usize;
    let mut total_skipped = 0usize;
    let mut total_failed = 0usize;
    for file in &report.files {
        let written = file.count(|s| matches!(s, ArtifactStatus::Written(_)));
        let skipped = file.count(|s| matches!(s, ArtifactStatus::Skipped(_)));
        let failed = file.count(|s| matches!(s, ArtifactStatus::Failed(_)));
        total_written += written;
        total_skipped += skipped;
        total_failed += failed;

        let (rows, kept) = match &file.status {
            FileStatus::Processed {
                rows_read,
                rows_kept,
                ..
            } => (Cell::new(rows_read), Cell::new(rows_kept)),
            FileStatus::Empty { rows_read } => (Cell::new(rows_read), dim_cell(0)),
            FileStatus::LoadFailed { .. } => (dim_cell("-"), dim_cell("-")),
        };
        table.add_row(vec![
            Cell::new(file.path.display()),
            rows,
            kept,
            count_cell(written, Color::Green),
            count_cell(skipped, Color::Yellow),
            count_cell(failed, Color::Red),
            status_cell(file),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        count_cell(total_written, Color::Green).add_attribute(Attribute::Bold),
        count_cell(total_skipped, Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(total_failed, Color::Red).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    print_details(report);
}

/// Skipped and failed artifacts, plus load errors, one line each.
fn print_details(report: &RunReport) {
    let mut skipped = Vec::new();
    let mut errors = Vec::new();
    for file in &report.files {
        if let FileStatus::LoadFailed { message, .. } = &file.status {
            errors.push(message.clone());
        }
        for artifact in file.artifacts() {
            match &artifact.status {
                ArtifactStatus::Skipped(reason) => {
                    skipped.push(format!("{} {}: {reason}", file.path.display(), artifact.kind));
                }
                ArtifactStatus::Failed(message) => {
                    errors.push(format!("{} {}: {message}", file.path.display(), artifact.kind));
                }
                ArtifactStatus::Written(_) => {}
            }
        }
    }
    if !skipped.is_empty() {
        println!("Skipped:");
        for line in &skipped {
            println!("- {line}");
        }
    }
    if !errors.is_empty() {
        eprintln!("Errors:");
        for error in &errors {
            eprintln!("- {error}");
        }
    }
}

fn status_cell(file: &FileResult) -> Cell {
    match &file.status {
        FileStatus::LoadFailed { kind, .. } => Cell::new(kind_label(*kind))
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        FileStatus::Empty { .. } => Cell::new("no events").fg(Color::Yellow),
        FileStatus::Processed { .. } if file.has_errors() => Cell::new("errors").fg(Color::Red),
        FileStatus::Processed { .. } => Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    }
}

fn kind_label(kind: IngestErrorKind) -> &'static str {
    match kind {
        IngestErrorKind::NotFound => "not found",
        IngestErrorKind::EmptyInput => "empty input",
        IngestErrorKind::Parse => "parse error",
        IngestErrorKind::Io => "io error",
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
