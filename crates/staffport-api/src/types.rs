//! Response shapes returned by the upstream API.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use staffport_model::EmployeeRecord;

/// Body of the access token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

/// A list scale (`list[].scale`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleDescriptor {
    pub id: String,
    pub name: String,
}

/// A field declared on organization records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgFieldDescriptor {
    pub id: String,
    pub name: String,
}

/// Raw elements of the top-level array `key`, or empty when absent.
pub fn array_under<'a>(body: &'a Value, key: &str) -> &'a [Value] {
    body.get(key)
        .and_then(Value::as_array)
        .map_or(&[], Vec::as_slice)
}

/// Decode the `employees` array, skipping elements that are not records.
pub fn decode_employees(body: &Value) -> Vec<EmployeeRecord> {
    array_under(body, "employees")
        .iter()
        .enumerate()
        .filter_map(
            |(position, raw)| match EmployeeRecord::from_json(raw.clone()) {
                Ok(record) => Some(record),
                Err(error) => {
                    warn!(position, %error, "skipping malformed employee record");
                    None
                }
            },
        )
        .collect()
}

/// Distinct list scales in encounter order; the first name seen for an id wins.
pub fn decode_scales(body: &Value) -> Vec<ScaleDescriptor> {
    let mut seen = HashSet::new();
    let mut scales: Vec<ScaleDescriptor> = Vec::new();
    for item in array_under(body, "list") {
        let Some(scale) = item.get("scale") else {
            continue;
        };
        let id = scalar_text(scale.get("id"));
        if id.is_empty() || !seen.insert(id.clone()) {
            continue;
        }
        scales.push(ScaleDescriptor {
            id,
            name: scalar_text(scale.get("name")),
        });
    }
    scales
}

/// Distinct organization fields in encounter order; the first name wins.
pub fn decode_org_fields(body: &Value) -> Vec<OrgFieldDescriptor> {
    let mut seen = HashSet::new();
    let mut fields: Vec<OrgFieldDescriptor> = Vec::new();
    for organization in array_under(body, "organizations") {
        let Some(field_map) = organization.get("field").and_then(Value::as_object) else {
            continue;
        };
        for (id, field) in field_map {
            if !seen.insert(id.as_str()) {
                continue;
            }
            fields.push(OrgFieldDescriptor {
                id: id.clone(),
                name: scalar_text(field.get("name")),
            });
        }
    }
    fields
}

fn scalar_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_scales_first_wins() {
        let body = json!({"list": [
            {"scale": {"id": "12", "name": "Grades"}},
            {"scale": {"id": 3, "name": "Levels"}},
            {"scale": {"id": "12", "name": "Renamed"}},
            {"noscale": true},
            {"scale": {"name": "No id"}}
        ]});
        let scales = decode_scales(&body);
        assert_eq!(
            scales,
            vec![
                ScaleDescriptor {
                    id: "12".to_string(),
                    name: "Grades".to_string()
                },
                ScaleDescriptor {
                    id: "3".to_string(),
                    name: "Levels".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_decode_org_fields() {
        let body = json!({"organizations": [
            {"field": {"1": {"name": "Org name"}, "5": {"name": "Cost center"}}},
            {"field": {"5": {"name": "Other"}, "abc": {}}}
        ]});
        let fields = decode_org_fields(&body);
        let ids: Vec<&str> = fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "5", "abc"]);
        assert_eq!(fields[1].name, "Cost center");
        assert_eq!(fields[2].name, "");
    }

    #[test]
    fn test_decode_employees_skips_malformed() {
        let body = json!({"employees": [{"username": "ada"}, "junk", {"username": "bob"}]});
        let records = decode_employees(&body);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].username(), "bob");
        assert!(decode_employees(&json!({"message": "none"})).is_empty());
    }
}
