use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use loanprep_cli::pipeline::PipelineReport;

pub fn print_summary(report: &PipelineReport) {
    println!("Input: {}", report.input.display());
    println!("Output: {}", report.output.display());

    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Metric"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);

    table.add_row(vec![
        stage_cell("Sample"),
        Cell::new("Rows read"),
        Cell::new(report.sample_rows_read),
    ]);
    table.add_row(vec![
        stage_cell("Sample"),
        Cell::new("Rows kept"),
        Cell::new(report.sample_rows_kept),
    ]);
    table.add_row(vec![
        stage_cell("Schema"),
        Cell::new("Columns"),
        Cell::new(report.schema_columns),
    ]);
    table.add_row(vec![
        stage_cell("Batches"),
        Cell::new("Processed"),
        Cell::new(report.batches_processed),
    ]);
    table.add_row(vec![
        stage_cell("Batches"),
        Cell::new("Skipped (no labels)"),
        count_cell(report.batches_skipped, Color::Yellow),
    ]);
    table.add_row(vec![
        stage_cell("Rows"),
        Cell::new("Read"),
        Cell::new(report.raw_rows),
    ]);
    table.add_row(vec![
        stage_cell("Rows"),
        Cell::new("Dropped by label filter"),
        count_cell(report.rows_dropped, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("Rows written").add_attribute(Attribute::Bold),
        Cell::new(report.rows_written)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    println!("Elapsed: {:.2?}", report.elapsed);

    if !report.drifted_columns.is_empty() {
        let mut drift = Table::new();
        drift.set_header(vec![header_cell("Columns outside the schema (dropped)")]);
        apply_table_style(&mut drift);
        for column in &report.drifted_columns {
            drift.add_row(vec![dim_cell(column)]);
        }
        println!();
        println!("{drift}");
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
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
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

fn stage_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
