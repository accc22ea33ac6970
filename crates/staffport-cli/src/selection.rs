//! Argument parsing and field selection helpers.

use chrono::NaiveDate;
use tracing::warn;

use staffport_export::{DOCUMENT_KINDS, ExportError, FieldCatalog, TimelineOptions};
use staffport_model::FieldId;

/// Parses a non-empty field id.
pub fn parse_field_id(value: &str) -> Result<FieldId, String> {
    FieldId::new(value).map_err(|e| e.to_string())
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_since_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("expected a date as YYYY-MM-DD, got '{value}'"))
}

/// Parses a single-character CSV delimiter; `tab` and `\t` mean a tab.
pub fn parse_delimiter(value: &str) -> Result<char, String> {
    let delimiter = match value {
        "tab" | "\\t" => '\t',
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => return Err(format!("delimiter must be one character, got '{value}'")),
            }
        }
    };
    let options = TimelineOptions {
        delimiter,
        ..TimelineOptions::default()
    };
    options.validate().map_err(|e| e.to_string())?;
    Ok(delimiter)
}

/// Requested ids that the catalog does not know.
pub fn unknown_fields<'a>(catalog: &FieldCatalog, requested: &'a [FieldId]) -> Vec<&'a FieldId> {
    requested.iter().filter(|id| !catalog.contains(id)).collect()
}

/// Resolves the document fields to work on.
///
/// With nothing requested every document field of the catalog is used, in
/// presentation order. Requested fields that are known but not documents are
/// dropped with a warning.
pub fn document_fields(
    catalog: &FieldCatalog,
    requested: &[FieldId],
) -> Result<Vec<FieldId>, ExportError> {
    let fields: Vec<FieldId> = if requested.is_empty() {
        catalog
            .presentation_order()
            .into_iter()
            .filter(|descriptor| DOCUMENT_KINDS.contains(&descriptor.kind))
            .map(|descriptor| descriptor.id.clone())
            .collect()
    } else {
        requested
            .iter()
            .filter(|id| match catalog.get(id) {
                Some(descriptor) if !descriptor.kind.is_document() => {
                    warn!(field = %id, kind = descriptor.kind.label(), "not a document field, ignoring");
                    false
                }
                _ => true,
            })
            .cloned()
            .collect()
    };
    if fields.is_empty() {
        return Err(ExportError::NoFieldsSelected);
    }
    Ok(fields)
}
