//! Employee records decoded from upstream JSON.
//!
//! Decoding is lenient: a field whose nested structure does not match the
//! expected shape decodes to an empty value of its kind instead of failing the
//! record. Only a record that is not a JSON object at all is rejected.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::{ModelError, Result};
use crate::field::{
    DEFAULT_EXTENSION, DocumentPayload, EntryValue, FieldDescriptor, FieldKind, FieldValue,
    TimelineEntry,
};
use crate::ids::FieldId;

/// Who an employee record belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Identity {
    pub username: String,
    pub display_name: String,
}

/// One field of one employee, as declared by that record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeField {
    pub id: FieldId,
    pub name: String,
    pub type_name: String,
    pub value: FieldValue,
    /// `timelineChange` entries in upstream order, whatever the kind.
    pub history: Vec<TimelineEntry>,
}

impl EmployeeField {
    pub fn kind(&self) -> FieldKind {
        self.value.kind()
    }

    /// Descriptor as declared by this record.
    pub fn descriptor(&self) -> FieldDescriptor {
        FieldDescriptor {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind(),
            type_name: self.type_name.clone(),
        }
    }
}

/// Immutable snapshot of one upstream employee.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRecord {
    pub identity: Identity,
    fields: Vec<EmployeeField>,
    index: HashMap<FieldId, usize>,
    raw: Value,
}

impl EmployeeRecord {
    /// Build a record from already-typed parts. The raw snapshot is empty.
    pub fn new(identity: Identity, fields: Vec<EmployeeField>) -> Self {
        let index = build_index(&fields);
        Self {
            identity,
            fields,
            index,
            raw: Value::Null,
        }
    }

    /// Decode one element of the upstream `employees` array.
    pub fn from_json(raw: Value) -> Result<Self> {
        let Value::Object(object) = &raw else {
            return Err(ModelError::NotAnObject {
                found: json_kind(&raw),
            });
        };
        let identity = Identity {
            username: text_of(object.get("username")).unwrap_or_default(),
            display_name: text_of(object.get("name")).unwrap_or_default(),
        };
        let mut fields = Vec::new();
        if let Some(Value::Object(field_map)) = object.get("field") {
            for (key, descriptor) in field_map {
                let Ok(id) = FieldId::new(key.as_str()) else {
                    continue;
                };
                fields.push(decode_field(id, descriptor));
            }
        }
        let index = build_index(&fields);
        Ok(Self {
            identity,
            fields,
            index,
            raw,
        })
    }

    pub fn username(&self) -> &str {
        &self.identity.username
    }

    pub fn display_name(&self) -> &str {
        &self.identity.display_name
    }

    /// Fields in upstream order.
    pub fn fields(&self) -> &[EmployeeField] {
        &self.fields
    }

    pub fn field(&self, id: &FieldId) -> Option<&EmployeeField> {
        self.index.get(id).map(|&position| &self.fields[position])
    }

    /// The JSON this record was decoded from (`Null` for hand-built records).
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Label used for rows and folders: the identifier field's current value,
    /// or the username when that field is absent or blank.
    pub fn subject_name(&self, identifier: Option<&FieldId>) -> String {
        identifier
            .and_then(|id| self.field(id))
            .and_then(|field| field.value.current_text())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map_or_else(|| self.identity.username.clone(), str::to_string)
    }
}

fn build_index(fields: &[EmployeeField]) -> HashMap<FieldId, usize> {
    let mut index = HashMap::with_capacity(fields.len());
    for (position, field) in fields.iter().enumerate() {
        index.entry(field.id.clone()).or_insert(position);
    }
    index
}

fn decode_field(id: FieldId, descriptor: &Value) -> EmployeeField {
    let object = descriptor.as_object();
    let name = object
        .and_then(|o| text_of(o.get("name")))
        .unwrap_or_default();
    let type_name = object
        .and_then(|o| text_of(o.get("type")))
        .unwrap_or_default();
    let data = object.and_then(|o| o.get("data")).unwrap_or(&Value::Null);
    let history = object
        .and_then(|o| o.get("timelineChange"))
        .map(decode_timeline)
        .unwrap_or_default();
    let value = match FieldKind::from_type_name(&type_name) {
        FieldKind::Text => FieldValue::Text {
            current: current_entry(data),
        },
        FieldKind::Single => FieldValue::Single {
            current: data.as_object().map(decode_document),
        },
        FieldKind::Photo => FieldValue::Photo {
            current: data.as_object().map(decode_document),
        },
        FieldKind::Multiple => FieldValue::Multiple {
            current: data
                .as_array()
                .map(|items| items.iter().map(decode_document_item).collect())
                .unwrap_or_default(),
        },
        FieldKind::Other => FieldValue::Other {
            current: current_entry(data),
        },
    };
    EmployeeField {
        id,
        name,
        type_name,
        value,
        history,
    }
}

fn current_entry(data: &Value) -> Option<TimelineEntry> {
    match decode_entry_value(data) {
        EntryValue::Missing => None,
        value => Some(TimelineEntry {
            valid_from: None,
            valid_to: None,
            value,
        }),
    }
}

fn decode_timeline(changes: &Value) -> Vec<TimelineEntry> {
    let Some(items) = changes.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| {
            let Some(change) = item.as_object() else {
                return TimelineEntry::default();
            };
            TimelineEntry {
                valid_from: text_of(change.get("dataValidFrom"))
                    .filter(|v| !v.is_empty())
                    .or_else(|| text_of(change.get("lastModified"))),
                valid_to: text_of(change.get("dataValidTo")).filter(|v| !v.is_empty()),
                value: change
                    .get("data")
                    .map(decode_entry_value)
                    .unwrap_or_default(),
            }
        })
        .collect()
}

fn decode_entry_value(data: &Value) -> EntryValue {
    match data {
        Value::Object(object) => EntryValue::Scalar {
            value: text_of(object.get("value")),
            alternative_export_value: text_of(object.get("alternativeExportValue")),
        },
        Value::Array(items) => EntryValue::List(
            items
                .iter()
                .map(|item| {
                    item.as_object()
                        .and_then(|o| text_of(o.get("value")))
                        .unwrap_or_default()
                })
                .collect(),
        ),
        _ => EntryValue::Missing,
    }
}

fn decode_document_item(item: &Value) -> DocumentPayload {
    match item.as_object() {
        Some(object) => decode_document(object),
        None => DocumentPayload {
            retrieval_link: None,
            extension: DEFAULT_EXTENSION.to_string(),
            title: None,
        },
    }
}

fn decode_document(object: &Map<String, Value>) -> DocumentPayload {
    let retrieval_link = object
        .get("link")
        .and_then(Value::as_object)
        .and_then(|link| text_of(link.get("href")))
        .filter(|href| !href.trim().is_empty());
    let extension = text_of(object.get("extension"))
        .map(|ext| ext.trim().trim_start_matches('.').to_string())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    DocumentPayload {
        retrieval_link,
        extension,
        title: text_of(object.get("title")),
    }
}

/// Text form of a scalar JSON value.
fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn id(value: &str) -> FieldId {
        FieldId::new(value).expect("valid id")
    }

    #[test]
    fn decodes_text_field_with_history() {
        let record = EmployeeRecord::from_json(json!({
            "username": "ada",
            "name": "Ada Lovelace",
            "field": {
                "47": {
                    "name": "Employee number",
                    "type": "TEXT",
                    "data": {"value": "E-1"},
                    "timelineChange": [
                        {"dataValidFrom": "2020-01-01", "dataValidTo": "2021-01-01", "data": {"value": "X"}},
                        {"lastModified": "2021-01-01", "dataValidTo": null, "data": [{"value": "a"}, {"value": "b"}]}
                    ]
                }
            }
        }))
        .expect("decode");

        assert_eq!(record.username(), "ada");
        assert_eq!(record.display_name(), "Ada Lovelace");
        let field = record.field(&id("47")).expect("field 47");
        assert_eq!(field.kind(), FieldKind::Text);
        assert_eq!(field.value.current_text(), Some("E-1"));
        let history = &field.history;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].valid_from.as_deref(), Some("2020-01-01"));
        assert_eq!(history[0].valid_to.as_deref(), Some("2021-01-01"));
        assert_eq!(history[1].valid_from.as_deref(), Some("2021-01-01"));
        assert!(history[1].is_open());
        assert_eq!(history[1].value.resolve(";"), "a;b");
    }

    #[test]
    fn decodes_document_shapes() {
        let record = EmployeeRecord::from_json(json!({
            "username": "bob",
            "field": {
                "200": {"name": "Contract", "type": "DOCUMENTSINGLE",
                        "data": {"link": {"href": "https://x/doc/1"}, "extension": "pdf", "title": "Contract 2020"}},
                "201": {"name": "Certificates", "type": "DOCUMENTMULTIPLE",
                        "data": [{"link": {"href": "https://x/doc/2"}}, {"title": "no link"}, 5]},
                "202": {"name": "Photo", "type": "PHOTO", "data": null}
            }
        }))
        .expect("decode");

        match &record.field(&id("200")).expect("200").value {
            FieldValue::Single {
                current: Some(payload),
            } => {
                assert_eq!(payload.retrieval_link.as_deref(), Some("https://x/doc/1"));
                assert_eq!(payload.extension, "pdf");
                assert_eq!(payload.title.as_deref(), Some("Contract 2020"));
            }
            other => panic!("unexpected value {other:?}"),
        }
        match &record.field(&id("201")).expect("201").value {
            FieldValue::Multiple { current } => {
                assert_eq!(current.len(), 3);
                assert!(current[0].is_retrievable());
                assert_eq!(current[0].extension, "dat");
                assert!(!current[1].is_retrievable());
                assert!(!current[2].is_retrievable());
            }
            other => panic!("unexpected value {other:?}"),
        }
        assert_eq!(
            record.field(&id("202")).expect("202").value,
            FieldValue::Photo { current: None }
        );
    }

    #[test]
    fn malformed_nested_structures_decode_empty() {
        let record = EmployeeRecord::from_json(json!({
            "username": "eve",
            "field": {
                "1": "not an object",
                "2": {"type": "TEXT", "timelineChange": "oops"},
                "3": {"type": "DOCUMENTMULTIPLE", "data": {"link": {}}}
            }
        }))
        .expect("decode");
        assert_eq!(record.field(&id("1")).expect("1").kind(), FieldKind::Other);
        assert!(record.field(&id("2")).expect("2").history.is_empty());
        assert_eq!(
            record.field(&id("3")).expect("3").value,
            FieldValue::Multiple { current: vec![] }
        );
    }

    #[test]
    fn untyped_field_keeps_history_and_current_value() {
        let record = EmployeeRecord::from_json(json!({
            "username": "dan",
            "field": {
                "10": {
                    "name": "Cost centre",
                    "data": {"value": "CC-7"},
                    "timelineChange": [
                        {"dataValidFrom": "2019-01-01", "dataValidTo": "2020-01-01", "data": {"value": "CC-3"}}
                    ]
                }
            }
        }))
        .expect("decode");
        let field = record.field(&id("10")).expect("field 10");
        assert_eq!(field.kind(), FieldKind::Other);
        assert_eq!(field.history.len(), 1);
        assert_eq!(field.history[0].value.resolve(";"), "CC-3");
        assert_eq!(field.value.current_text(), Some("CC-7"));
        assert_eq!(record.subject_name(Some(&id("10"))), "CC-7");
    }

    #[test]
    fn rejects_non_object_records() {
        let error = EmployeeRecord::from_json(json!([1, 2])).expect_err("array rejected");
        assert!(error.to_string().contains("array"));
    }

    #[test]
    fn subject_name_falls_back_to_username() {
        let record = EmployeeRecord::from_json(json!({
            "username": "carol",
            "field": {
                "47": {"type": "TEXT", "data": {"value": "  "}},
                "7": {"type": "TEXT", "data": {"value": "carol@example.com"}}
            }
        }))
        .expect("decode");
        assert_eq!(record.subject_name(Some(&id("7"))), "carol@example.com");
        assert_eq!(record.subject_name(Some(&id("47"))), "carol");
        assert_eq!(record.subject_name(Some(&id("999"))), "carol");
        assert_eq!(record.subject_name(None), "carol");
    }

    #[test]
    fn preserves_upstream_field_order() {
        let record = EmployeeRecord::from_json(json!({
            "username": "dan",
            "field": {"10": {"type": "TEXT"}, "2": {"type": "TEXT"}, "abc": {"type": "TEXT"}}
        }))
        .expect("decode");
        let ids: Vec<&str> = record.fields().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["10", "2", "abc"]);
    }
}
