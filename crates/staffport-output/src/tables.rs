//! CSV and JSON artifacts for timeline exports.

use csv::{Terminator, WriterBuilder};
use serde_json::Value;
use tracing::debug;

use staffport_export::{TimelineOptions, TimelineTable};
use staffport_model::{EmployeeRecord, ExportArtifact};

use crate::error::{OutputError, Result};

/// Encodes one table as a delimited UTF-8 CSV artifact, header first.
pub fn timeline_artifact(table: &TimelineTable, options: &TimelineOptions) -> Result<ExportArtifact> {
    let mut writer = WriterBuilder::new()
        .delimiter(options.delimiter_byte())
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(row.cells())?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| OutputError::Csv(e.error().to_string()))?;

    debug!(file = %table.file_name, bytes = bytes.len(), "timeline CSV encoded");
    Ok(ExportArtifact::new(table.file_name.clone(), bytes))
}

/// Encodes every table, in order.
pub fn timeline_artifacts(
    tables: &[TimelineTable],
    options: &TimelineOptions,
) -> Result<Vec<ExportArtifact>> {
    tables
        .iter()
        .map(|table| timeline_artifact(table, options))
        .collect()
}

/// Pretty-printed snapshot of the raw employee JSON, named `{prefix}debug.json`.
pub fn json_backup(records: &[EmployeeRecord], prefix: &str) -> Result<ExportArtifact> {
    let snapshot = Value::Array(records.iter().map(|r| r.raw().clone()).collect());
    let bytes = serde_json::to_vec_pretty(&snapshot)?;
    Ok(ExportArtifact::new(format!("{prefix}debug.json"), bytes))
}

/// Name of the archive that bundles one timeline export.
pub fn archive_name(prefix: &str) -> String {
    format!("{prefix}export.zip")
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use staffport_export::{discover, extract_timelines};
    use staffport_model::FieldId;

    use super::*;

    fn sample() -> Vec<EmployeeRecord> {
        vec![
            EmployeeRecord::from_json(json!({
                "username": "ada",
                "name": "Ada Lovelace",
                "field": {
                    "47": {"name": "Employee number", "type": "TEXT", "data": {"value": "1001"}},
                    "12": {
                        "name": "Job title",
                        "type": "TEXT",
                        "timelineChange": [
                            {"dataValidFrom": "2020-01-01", "dataValidTo": "2021-06-30", "data": {"value": "Analyst; junior"}},
                            {"dataValidFrom": "2021-07-01", "data": [{"value": "Lead"}, {"value": "Architect"}]}
                        ]
                    }
                }
            }))
            .expect("record"),
            EmployeeRecord::from_json(json!({
                "username": "bjørn",
                "name": "Bjørn Ødegård",
                "field": {
                    "12": {
                        "name": "Job title",
                        "type": "TEXT",
                        "timelineChange": [
                            {"lastModified": "2019-03-01", "data": {"value": "", "alternativeExportValue": "CEO"}}
                        ]
                    }
                }
            }))
            .expect("record"),
        ]
    }

    #[test]
    fn timeline_csv_snapshot() {
        let records = sample();
        let catalog = discover(&records, None);
        let options = TimelineOptions::default();
        let id = |v: &str| FieldId::new(v).expect("id");
        let tables =
            extract_timelines(&records, &catalog, Some(&id("47")), &[id("12")], &options)
                .expect("extract");
        let artifact = timeline_artifact(&tables[0], &options).expect("csv");

        assert_eq!(artifact.name(), "historical_Job_title.csv");
        let text = String::from_utf8(artifact.bytes().to_vec()).expect("utf-8");
        insta::assert_snapshot!(text, @r#"
        Employee number;Name;Username;Job title;Valid From;Valid To
        1001;Ada Lovelace;ada;"Analyst; junior";2020-01-01;2021-06-30
        1001;Ada Lovelace;ada;"Lead;Architect";2021-07-01;
        bjørn;Bjørn Ødegård;bjørn;CEO;2019-03-01;
        "#);
    }

    #[test]
    fn header_only_for_empty_input() {
        let options = TimelineOptions {
            delimiter: ',',
            ..TimelineOptions::default()
        };
        let catalog = discover(&[], None);
        let tables = extract_timelines(
            &[],
            &catalog,
            None,
            &[FieldId::new("5").expect("id")],
            &options,
        )
        .expect("extract");
        let artifact = timeline_artifact(&tables[0], &options).expect("csv");
        assert_eq!(
            artifact.bytes(),
            b"Username,Name,Username,Field 5,Valid From,Valid To\n"
        );
    }

    #[test]
    fn json_backup_preserves_non_ascii() {
        let artifact = json_backup(&sample(), "p_").expect("json");
        assert_eq!(artifact.name(), "p_debug.json");
        let text = std::str::from_utf8(artifact.bytes()).expect("utf-8");
        assert!(text.contains("Bjørn Ødegård"));
        assert!(text.starts_with("[\n  {"));
        assert_eq!(archive_name("p_"), "p_export.zip");
    }
}
