//! Integration tests for argument parsing and field selection.

use serde_json::json;

use staffport_cli::selection::{
    document_fields, parse_delimiter, parse_field_id, parse_since_date, unknown_fields,
};
use staffport_export::{ExportError, discover};
use staffport_model::{EmployeeRecord, FieldId};

fn id(value: &str) -> FieldId {
    FieldId::new(value).expect("valid id")
}

fn records() -> Vec<EmployeeRecord> {
    vec![
        EmployeeRecord::from_json(json!({
            "username": "ada",
            "field": {
                "10": {"name": "Department", "type": "TEXT"},
                "300": {"name": "Photo", "type": "PHOTO"},
                "200": {"name": "Contract", "type": "DOCUMENTSINGLE"},
                "25": {"name": "Certificates", "type": "DOCUMENTMULTIPLE"}
            }
        }))
        .expect("record"),
    ]
}

#[test]
fn delimiter_accepts_single_characters_and_tab() {
    assert_eq!(parse_delimiter(";"), Ok(';'));
    assert_eq!(parse_delimiter(","), Ok(','));
    assert_eq!(parse_delimiter("tab"), Ok('\t'));
    assert_eq!(parse_delimiter("\\t"), Ok('\t'));
}

#[test]
fn delimiter_rejects_unusable_values() {
    assert!(parse_delimiter("").is_err());
    assert!(parse_delimiter(";;").is_err());
    assert!(parse_delimiter("\"").is_err());
    assert!(parse_delimiter("§").is_err());
}

#[test]
fn since_date_requires_iso_format() {
    assert_eq!(
        parse_since_date("2023-06-01").map(|d| d.to_string()),
        Ok("2023-06-01".to_string())
    );
    assert!(parse_since_date("01.06.2023").is_err());
    assert!(parse_since_date("2023-13-01").is_err());
}

#[test]
fn field_id_must_not_be_blank() {
    assert_eq!(parse_field_id("47").map(|f| f.as_str().to_string()), Ok("47".to_string()));
    assert!(parse_field_id("  ").is_err());
}

#[test]
fn all_document_fields_in_presentation_order_by_default() {
    let records = records();
    let catalog = discover(&records, None);
    let fields = document_fields(&catalog, &[]).expect("fields");
    let ids: Vec<&str> = fields.iter().map(FieldId::as_str).collect();
    assert_eq!(ids, vec!["25", "200", "300"]);
}

#[test]
fn requested_text_fields_are_dropped() {
    let records = records();
    let catalog = discover(&records, None);
    let fields = document_fields(&catalog, &[id("10"), id("200"), id("999")]).expect("fields");
    let ids: Vec<&str> = fields.iter().map(FieldId::as_str).collect();
    assert_eq!(ids, vec!["200", "999"]);

    let err = document_fields(&catalog, &[id("10")]).expect_err("no document fields");
    assert!(matches!(err, ExportError::NoFieldsSelected));
}

#[test]
fn empty_catalog_has_no_document_fields() {
    let catalog = discover(&[], None);
    assert!(matches!(
        document_fields(&catalog, &[]),
        Err(ExportError::NoFieldsSelected)
    ));
}

#[test]
fn reports_unknown_fields() {
    let records = records();
    let catalog = discover(&records, None);
    let requested = [id("10"), id("11")];
    let unknown: Vec<&str> = unknown_fields(&catalog, &requested)
        .into_iter()
        .map(FieldId::as_str)
        .collect();
    assert_eq!(unknown, vec!["11"]);
}
