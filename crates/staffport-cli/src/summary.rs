use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use staffport_model::RunResult;

use crate::types::{
    CountResult, DownloadResult, FieldsResult, HistoryResult, OverviewResult, ZipResult,
};

pub fn print_fields(result: &FieldsResult) {
    println!("Employees: {}", result.records);
    let mut table = new_table(vec!["ID", "Name", "Kind", "Type", "Identifier"]);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for field in &result.fields {
        let identifier = result.identifier_candidates.contains(&field.id);
        table.add_row(vec![
            Cell::new(field.id.as_str()),
            Cell::new(field.display_name()),
            Cell::new(field.kind.label()),
            type_cell(&field.type_name),
            if identifier {
                Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
            } else {
                dim_cell("-")
            },
        ]);
    }
    println!("{table}");
    print_warnings(&result.warnings);
}

pub fn print_history(result: &HistoryResult) {
    println!("Employees: {}", result.records);
    println!("Archive: {}", result.archive.display());
    let mut table = new_table(vec!["File", "Field", "Rows"]);
    align_column(&mut table, 2, CellAlignment::Right);
    let mut total_rows = 0usize;
    for summary in &result.tables {
        total_rows += summary.rows;
        table.add_row(vec![
            Cell::new(&summary.file_name),
            Cell::new(&summary.field_label),
            count_cell(summary.rows, Color::Reset),
        ]);
    }
    for name in &result.extra_files {
        table.add_row(vec![Cell::new(name), dim_cell("raw employee JSON"), dim_cell("-")]);
    }
    table.add_row(vec![
        total_cell("TOTAL"),
        total_cell("All fields"),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_warnings(&result.warnings);
}

pub fn print_counts(result: &CountResult) {
    println!("Employees: {}", result.records);
    println!("Fields: {}", result.fields.join(", "));
    let mut table = new_table(vec!["Kind", "Documents"]);
    align_column(&mut table, 1, CellAlignment::Right);
    let counts = &result.counts;
    for (kind, count) in [
        ("Single documents", counts.single),
        ("Multiple documents", counts.multiple),
        ("Photos", counts.photo),
    ] {
        table.add_row(vec![Cell::new(kind), count_cell(count, Color::Reset)]);
    }
    table.add_row(vec![
        total_cell("TOTAL"),
        Cell::new(counts.total()).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_warnings(&result.warnings);
}

pub fn print_download(result: &DownloadResult) {
    println!("Employees: {}", result.records);
    println!("Output: {}", result.destination.display());
    print_run(&result.run);
    print_warnings(&result.warnings);
}

fn print_run(run: &RunResult) {
    let mut table = new_table(vec!["Expected", "Attempted", "Succeeded", "Failed", "Skipped"]);
    for index in 0..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(run.items_expected),
        Cell::new(run.attempted()),
        count_cell(run.items_succeeded, Color::Green),
        count_cell(run.failed(), Color::Red),
        count_cell(run.skipped.len(), Color::Yellow),
    ]);
    println!("{table}");

    if run.failures.is_empty() && run.skipped.is_empty() {
        return;
    }
    let mut issues = new_table(vec!["Status", "Item", "Reason"]);
    align_column(&mut issues, 0, CellAlignment::Center);
    for failure in &run.failures {
        issues.add_row(vec![
            Cell::new("failed").fg(Color::Red).add_attribute(Attribute::Bold),
            Cell::new(&failure.subject),
            Cell::new(&failure.reason),
        ]);
    }
    for skip in &run.skipped {
        issues.add_row(vec![
            Cell::new("skipped").fg(Color::Yellow),
            Cell::new(&skip.subject),
            Cell::new(&skip.reason),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{issues}");
}

pub fn print_overview(result: &OverviewResult) {
    println!("Workbook: {}", result.workbook.display());
    let mut table = new_table(vec!["Sheet", "Rows"]);
    align_column(&mut table, 1, CellAlignment::Right);
    for (sheet, rows) in [
        (staffport_output::EMPLOYEE_SHEET, result.employee_fields),
        (staffport_output::LISTS_SHEET, result.lists),
        (staffport_output::ORGANIZATIONS_SHEET, result.organizations),
    ] {
        let name = if rows == 0 {
            dim_cell(format!("{sheet} (not written)"))
        } else {
            Cell::new(sheet)
        };
        table.add_row(vec![name, count_cell(rows, Color::Reset)]);
    }
    println!("{table}");
    print_warnings(&result.warnings);
}

pub fn print_zip(result: &ZipResult) {
    println!("Mode: {}", result.mode);
    println!("Output: {}", result.output_dir.display());
    let summary = &result.summary;
    let mut table = new_table(vec!["Processed", "Compressed", "Failed"]);
    for index in 0..3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(summary.processed),
        count_cell(summary.compressed, Color::Green),
        count_cell(summary.failed, Color::Red),
    ]);
    println!("{table}");
}

fn print_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    eprintln!("Warnings:");
    for warning in warnings {
        eprintln!("- {warning}");
    }
}

fn new_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.set_header(headers.into_iter().map(header_cell).collect::<Vec<_>>());
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    table
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

fn total_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn type_cell(type_name: &str) -> Cell {
    if type_name.trim().is_empty() {
        dim_cell("-")
    } else {
        Cell::new(type_name)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else if color == Color::Reset {
        Cell::new(count)
    } else {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
