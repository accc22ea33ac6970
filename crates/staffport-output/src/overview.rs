//! Field overview workbook: employee fields, list scales and organization fields.

use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};
use tracing::{debug, info};

use staffport_model::{FieldDescriptor, FieldId, sort_by_presentation};

use crate::error::{OutputError, Result};

pub const EMPLOYEE_SHEET: &str = "Employee Fields";
pub const LISTS_SHEET: &str = "Lists";
pub const ORGANIZATIONS_SHEET: &str = "Organizations";

/// Largest integer a spreadsheet number holds exactly.
const MAX_EXACT_NUMBER: u64 = 1 << 53;

/// One row of the overview: id, name and an optional type column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewEntry {
    pub id: FieldId,
    pub name: String,
    pub type_name: Option<String>,
}

impl OverviewEntry {
    pub fn new(id: FieldId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            type_name: None,
        }
    }
}

impl From<&FieldDescriptor> for OverviewEntry {
    fn from(descriptor: &FieldDescriptor) -> Self {
        Self {
            id: descriptor.id.clone(),
            name: descriptor.name.clone(),
            type_name: Some(descriptor.type_name.clone()),
        }
    }
}

/// Inputs for the overview workbook, one list per sheet.
#[derive(Debug, Clone, Default)]
pub struct FieldOverview {
    pub employee_fields: Vec<OverviewEntry>,
    pub lists: Vec<OverviewEntry>,
    pub organizations: Vec<OverviewEntry>,
}

impl FieldOverview {
    pub fn is_empty(&self) -> bool {
        self.employee_fields.is_empty() && self.lists.is_empty() && self.organizations.is_empty()
    }
}

/// `{domain}_field_overview.xlsx` with dots in the domain replaced by `_`.
pub fn overview_file_name(domain: &str) -> String {
    format!("{}_field_overview.xlsx", domain.trim().replace('.', "_"))
}

/// Builds the workbook. Empty sheets are left out; all empty is an error.
pub fn build_overview(overview: &FieldOverview) -> Result<Vec<u8>> {
    if overview.is_empty() {
        return Err(OutputError::NoOverviewData);
    }

    let mut workbook = Workbook::new();
    let format = Format::new().set_align(FormatAlign::Left);
    let sheets = [
        (EMPLOYEE_SHEET, &overview.employee_fields, true),
        (LISTS_SHEET, &overview.lists, false),
        (ORGANIZATIONS_SHEET, &overview.organizations, false),
    ];
    for (name, entries, with_type) in sheets {
        if entries.is_empty() {
            debug!(sheet = name, "skipping empty sheet");
            continue;
        }
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(name)?;
        write_sheet(worksheet, entries, with_type, &format)?;
    }

    let bytes = workbook.save_to_buffer()?;
    info!(
        employee_fields = overview.employee_fields.len(),
        lists = overview.lists.len(),
        organizations = overview.organizations.len(),
        "field overview workbook built"
    );
    Ok(bytes)
}

/// The id as a number cell, when that reads back as the same text.
fn numeric_cell(id: &FieldId) -> Option<f64> {
    id.numeric()
        .filter(|number| *number <= MAX_EXACT_NUMBER && number.to_string() == id.as_str())
        .map(|number| number as f64)
}

fn write_sheet(
    worksheet: &mut Worksheet,
    entries: &[OverviewEntry],
    with_type: bool,
    format: &Format,
) -> Result<()> {
    let mut rows: Vec<&OverviewEntry> = entries.iter().collect();
    sort_by_presentation(&mut rows, |entry| &entry.id);

    let header: &[&str] = if with_type {
        &["ID", "Name", "Type"]
    } else {
        &["ID", "Name"]
    };
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for (col, title) in (0u16..).zip(header) {
        worksheet.write_string_with_format(0, col, *title, format)?;
    }

    for (row, entry) in (1u32..).zip(&rows) {
        let id_text = entry.id.as_str();
        match numeric_cell(&entry.id) {
            Some(number) => worksheet.write_number_with_format(row, 0, number, format)?,
            None => worksheet.write_string_with_format(row, 0, id_text, format)?,
        };
        worksheet.write_string_with_format(row, 1, &entry.name, format)?;
        widths[0] = widths[0].max(id_text.chars().count());
        widths[1] = widths[1].max(entry.name.chars().count());
        if with_type {
            let type_name = entry.type_name.as_deref().unwrap_or_default();
            worksheet.write_string_with_format(row, 2, type_name, format)?;
            widths[2] = widths[2].max(type_name.chars().count());
        }
    }

    for (col, width) in (0u16..).zip(widths) {
        worksheet.set_column_width(col, (width + 2) as f64)?;
    }
    Ok(())
}
