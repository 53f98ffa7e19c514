use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use tidas_cli::types::{DatasetOutcome, DatasetReport, WorkflowResult};

pub fn print_summary(result: &WorkflowResult) {
    println!("User: {}", result.user_id);
    if result.dry_run {
        println!("Mode: analysis only (nothing written)");
    } else {
        println!("Output: {}", result.output_dir.display());
    }
    if let Some(path) = &result.audit_log {
        println!("Audit log: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Scope"),
        header_cell("Missing"),
        header_cell("Outcome"),
    ]);
    apply_summary_table_style(&mut table);
    for report in &result.datasets {
        table.add_row(vec![
            Cell::new(&report.dataset_id)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            text_cell(&report.scope),
            text_cell(&report.missing),
            outcome_cell(report),
        ]);
    }
    println!("{table}");

    let mut totals = Table::new();
    totals.set_header(vec![
        header_cell("Written"),
        header_cell("Pending"),
        header_cell("Unchanged"),
        header_cell("Skipped"),
    ]);
    apply_table_style(&mut totals);
    totals.add_row(vec![
        count_cell(result.written(), Color::Green),
        count_cell(result.pending(), Color::Yellow),
        count_cell(result.unchanged(), Color::Green),
        count_cell(result.skipped(), Color::Red),
    ]);
    for index in 0..4 {
        align_column(&mut totals, index, CellAlignment::Right);
    }
    println!("{totals}");
}

fn outcome_cell(report: &DatasetReport) -> Cell {
    match &report.outcome {
        DatasetOutcome::Written(_) => Cell::new("written")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        DatasetOutcome::Pending => Cell::new("needs update").fg(Color::Yellow),
        DatasetOutcome::Unchanged => dim_cell("up to date"),
        DatasetOutcome::Skipped(reason) => Cell::new(format!("skipped: {reason}")).fg(Color::Red),
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
        .set_width(165);
    table.set_constraints(vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(12)),
        ColumnConstraint::UpperBoundary(Width::Percentage(30)),
        ColumnConstraint::UpperBoundary(Width::Percentage(45)),
        ColumnConstraint::UpperBoundary(Width::Percentage(25)),
    ]);
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

fn text_cell(value: &str) -> Cell {
    if value.is_empty() || value == "-" || value == "none" {
        dim_cell(if value.is_empty() { "-" } else { value })
    } else {
        Cell::new(value)
    }
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
