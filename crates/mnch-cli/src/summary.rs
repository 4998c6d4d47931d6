use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use mnch_report::CoverageTable;

use crate::types::RunResult;

pub fn print_summary(result: &RunResult) {
    let window = result.config.window;
    println!("Input: {}", result.input_dir.display());
    if result.dry_run {
        println!(
            "Output: dry run, would write {}",
            result.output.outputs.names().collect::<Vec<_>>().join(", ")
        );
    } else {
        println!("Output: {}", result.output_dir.display());
    }
    println!(
        "Window: {}-{}, births {}",
        window.year_min, window.year_max, window.births_year
    );
    print_source_table(result);
    print_join_table(result);
    print_coverage_table(result);
    if !result.output.written.is_empty() {
        println!();
        println!("Files:");
        for path in &result.output.written {
            println!("- {}", path.display());
        }
    }
}

fn print_source_table(result: &RunResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("File"),
        header_cell("Rows"),
        header_cell("Skipped"),
        header_cell("Unknown keys"),
    ]);
    apply_summary_table_style(&mut table);
    for column in 2..5 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for count in &result.run.counts {
        let file = count
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown");
        let dropped = result
            .run
            .key_reports
            .iter()
            .find(|report| report.source == count.kind.as_str())
            .map(|report| report.dropped);
        table.add_row(vec![
            Cell::new(count.kind)
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new(file),
            Cell::new(count.rows),
            count_cell(Some(count.skipped), Color::Yellow),
            count_cell(dropped, Color::Yellow),
        ]);
    }
    println!();
    println!("Sources:");
    println!("{table}");
}

fn print_join_table(result: &RunResult) {
    let diagnostics = &result.run.reconciliation.diagnostics;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Join stage"),
        header_cell("Missing from source"),
        header_cell("Only in source"),
        header_cell("Dropped"),
    ]);
    apply_summary_table_style(&mut table);
    for column in 1..4 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for stage in &diagnostics.stages {
        table.add_row(vec![
            Cell::new(&stage.stage),
            Cell::new(stage.left_only.len()),
            Cell::new(stage.right_only.len()),
            count_cell(Some(stage.dropped_count()), Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        count_cell(Some(diagnostics.dropped_count()), Color::Yellow)
            .add_attribute(Attribute::Bold),
    ]);
    println!();
    println!(
        "Reconciled countries: {}",
        result.run.reconciliation.records.len()
    );
    println!("{table}");
}

fn print_coverage_table(result: &RunResult) {
    let coverage = CoverageTable::from_aggregates(&result.run.aggregates);
    if coverage.is_empty() {
        println!();
        println!("No country matched across all sources.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Group"),
        header_cell("Countries"),
        header_cell("Births (k)"),
        header_cell("ANC4 mean"),
        header_cell("ANC4 weighted"),
        header_cell("SBA mean"),
        header_cell("SBA weighted"),
    ]);
    apply_summary_table_style(&mut table);
    for column in 1..7 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for row in &coverage.rows {
        table.add_row(vec![
            Cell::new(row.group)
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new(row.country_count),
            Cell::new(format!("{:.0}", row.total_births_thousands)),
            percent_cell(row.anc4_mean),
            percent_cell(row.anc4_weighted_mean),
            percent_cell(row.sba_mean),
            percent_cell(row.sba_weighted_mean),
        ]);
    }
    println!();
    println!("Coverage:");
    println!("{table}");
}

fn percent_cell(value: f64) -> Cell {
    Cell::new(format!("{value:.1}%"))
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
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
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
