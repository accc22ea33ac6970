//! Timeline extraction into per-field tables.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, info};

use staffport_model::{EmployeeRecord, FieldDescriptor, FieldId, TimelineEntry};

use crate::discovery::FieldCatalog;
use crate::error::{ExportError, Result};

/// Default column delimiter, also used to join list values.
pub const DEFAULT_DELIMITER: char = ';';

/// Default prefix for generated artifact names.
pub const DEFAULT_PREFIX: &str = "historical_";

/// Fixed column titles after the identifier column.
const NAME_HEADER: &str = "Name";
const USERNAME_HEADER: &str = "Username";
const VALID_FROM_HEADER: &str = "Valid From";
const VALID_TO_HEADER: &str = "Valid To";

/// Options for timeline export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineOptions {
    /// Drop entries that are still in effect.
    pub exclude_current: bool,
    pub delimiter: char,
    /// Drop entries that ended before this date.
    pub since_date: Option<NaiveDate>,
    pub prefix: String,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            exclude_current: false,
            delimiter: DEFAULT_DELIMITER,
            since_date: None,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl TimelineOptions {
    /// Checks that the delimiter can be written as a single CSV byte.
    pub fn validate(&self) -> Result<()> {
        let d = self.delimiter;
        if !d.is_ascii() || d == '"' || d == '\n' || d == '\r' {
            return Err(ExportError::InvalidDelimiter(d.to_string()));
        }
        Ok(())
    }

    /// Delimiter as the byte the CSV writer expects.
    pub fn delimiter_byte(&self) -> u8 {
        let mut buffer = [0u8; 4];
        self.delimiter.encode_utf8(&mut buffer);
        buffer[0]
    }

    fn keeps(&self, entry: &TimelineEntry) -> bool {
        if self.exclude_current && entry.is_open() {
            return false;
        }
        match (self.since_date, ended_on(entry)) {
            (Some(since), Some(ended)) => ended >= since,
            _ => true,
        }
    }
}

/// End date of an entry when it parses as a date.
fn ended_on(entry: &TimelineEntry) -> Option<NaiveDate> {
    let raw = entry.valid_to.as_deref()?.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineRow {
    pub identifier: String,
    pub display_name: String,
    pub username: String,
    pub value: String,
    pub valid_from: String,
    pub valid_to: String,
}

impl TimelineRow {
    pub fn cells(&self) -> [&str; 6] {
        [
            &self.identifier,
            &self.display_name,
            &self.username,
            &self.value,
            &self.valid_from,
            &self.valid_to,
        ]
    }
}

/// Rows for one field, ready to be encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineTable {
    pub field_id: FieldId,
    /// Artifact name, unique within one export.
    pub file_name: String,
    pub header: [String; 6],
    pub rows: Vec<TimelineRow>,
}

/// Replaces every non-alphanumeric character with `_` and trims `_` at both ends.
pub fn safe_file_stem(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    replaced.trim_matches('_').to_string()
}

/// Extracts one table per selected field, in selection order.
///
/// Rows follow employee order, then entry order within each employee. The
/// identifier column holds the identifier field's current value, or the
/// username when that is absent or blank.
pub fn extract_timelines(
    records: &[EmployeeRecord],
    catalog: &FieldCatalog,
    identifier: Option<&FieldId>,
    selected: &[FieldId],
    options: &TimelineOptions,
) -> Result<Vec<TimelineTable>> {
    options.validate()?;
    let joiner = options.delimiter.to_string();
    let identifier_header = identifier
        .and_then(|id| catalog.get(id))
        .map_or_else(|| USERNAME_HEADER.to_string(), FieldDescriptor::display_name);

    let mut used_names = HashSet::new();
    let mut tables = Vec::with_capacity(selected.len());
    for field_id in selected {
        let field_name = catalog.display_name(field_id);
        let file_name = unique_name(&mut used_names, &options.prefix, &field_name, field_id);

        let mut rows = Vec::new();
        for record in records {
            let Some(field) = record.field(field_id) else {
                continue;
            };
            let subject = record.subject_name(identifier);
            for entry in &field.history {
                if !options.keeps(entry) {
                    continue;
                }
                rows.push(TimelineRow {
                    identifier: subject.clone(),
                    display_name: record.display_name().to_string(),
                    username: record.username().to_string(),
                    value: entry.value.resolve(&joiner),
                    valid_from: entry.valid_from.clone().unwrap_or_default(),
                    valid_to: entry.valid_to.clone().unwrap_or_default(),
                });
            }
        }
        debug!(field = %field_id, file = %file_name, rows = rows.len(), "timeline extracted");
        tables.push(TimelineTable {
            field_id: field_id.clone(),
            file_name,
            header: [
                identifier_header.clone(),
                NAME_HEADER.to_string(),
                USERNAME_HEADER.to_string(),
                field_name,
                VALID_FROM_HEADER.to_string(),
                VALID_TO_HEADER.to_string(),
            ],
            rows,
        });
    }
    info!(
        employees = records.len(),
        fields = tables.len(),
        "timeline extraction complete"
    );
    Ok(tables)
}

/// Picks `{prefix}{stem}.csv`, then `_{field_id}`, then a counter, until unused.
fn unique_name(
    used: &mut HashSet<String>,
    prefix: &str,
    field_name: &str,
    field_id: &FieldId,
) -> String {
    let base = format!("{prefix}{}", safe_file_stem(field_name));
    let name = format!("{base}.csv");
    if used.insert(name.clone()) {
        return name;
    }
    let suffixed = format!("{base}_{field_id}");
    let mut name = format!("{suffixed}.csv");
    let mut counter = 2usize;
    while !used.insert(name.clone()) {
        name = format!("{suffixed}_{counter}.csv");
        counter += 1;
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(valid_to: Option<&str>) -> TimelineEntry {
        TimelineEntry {
            valid_from: Some("2020-01-01".to_string()),
            valid_to: valid_to.map(str::to_string),
            ..TimelineEntry::default()
        }
    }

    #[test]
    fn safe_stem_replaces_and_trims() {
        assert_eq!(safe_file_stem("Job title (EN)"), "Job_title__EN");
        assert_eq!(safe_file_stem("__Løn__"), "Løn");
        assert_eq!(safe_file_stem("???"), "");
    }

    #[test]
    fn since_date_drops_entries_that_ended_earlier() {
        let options = TimelineOptions {
            since_date: NaiveDate::from_ymd_opt(2022, 1, 1),
            ..TimelineOptions::default()
        };
        assert!(!options.keeps(&entry(Some("2021-12-31"))));
        assert!(options.keeps(&entry(Some("2022-01-01T00:00:00"))));
        assert!(options.keeps(&entry(Some("not a date"))));
        assert!(options.keeps(&entry(None)));
    }

    #[test]
    fn exclude_current_drops_open_entries() {
        let options = TimelineOptions {
            exclude_current: true,
            ..TimelineOptions::default()
        };
        assert!(!options.keeps(&entry(None)));
        assert!(!options.keeps(&entry(Some(""))));
        assert!(options.keeps(&entry(Some("2021-01-01"))));
    }

    #[test]
    fn rejects_unwritable_delimiters() {
        for delimiter in ['"', '\n', 'é'] {
            let options = TimelineOptions {
                delimiter,
                ..TimelineOptions::default()
            };
            assert!(options.validate().is_err());
        }
        assert_eq!(TimelineOptions::default().delimiter_byte(), b';');
    }

    #[test]
    fn duplicate_names_get_field_id_suffix() {
        let mut used = HashSet::new();
        let a = FieldId::new("10").expect("id");
        let b = FieldId::new("11").expect("id");
        assert_eq!(unique_name(&mut used, "h_", "Salary", &a), "h_Salary.csv");
        assert_eq!(unique_name(&mut used, "h_", "Salary", &b), "h_Salary_11.csv");
        assert_eq!(unique_name(&mut used, "h_", "Salary", &b), "h_Salary_11_2.csv");
    }

    #[test]
    fn suffixed_name_already_taken_falls_through_to_counter() {
        let mut used = HashSet::new();
        let names: Vec<String> = [("2", "Pay 1"), ("9", "Pay"), ("1", "Pay")]
            .into_iter()
            .map(|(id, name)| {
                unique_name(&mut used, "historical_", name, &FieldId::new(id).expect("id"))
            })
            .collect();
        assert_eq!(
            names,
            vec![
                "historical_Pay_1.csv",
                "historical_Pay.csv",
                "historical_Pay_1_2.csv"
            ]
        );
    }
}
