//! Field schema discovery across employee records.

use std::collections::HashMap;

use tracing::debug;

use staffport_model::{EmployeeRecord, FieldDescriptor, FieldId, FieldKind, sort_by_presentation};

/// Field ids commonly used to identify an employee: username, e-mail,
/// employee number and profile id.
pub const IDENTIFIER_FIELD_IDS: [&str; 4] = ["0", "7", "47", "101"];

/// Distinct fields seen across a set of records, in encounter order.
///
/// The first descriptor registered for an id is kept; later sightings with a
/// different name or kind are ignored.
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    descriptors: Vec<FieldDescriptor>,
    index: HashMap<FieldId, usize>,
}

impl FieldCatalog {
    fn register(&mut self, descriptor: FieldDescriptor) {
        if self.index.contains_key(&descriptor.id) {
            return;
        }
        self.index
            .insert(descriptor.id.clone(), self.descriptors.len());
        self.descriptors.push(descriptor);
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn contains(&self, id: &FieldId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &FieldId) -> Option<&FieldDescriptor> {
        self.index.get(id).map(|&position| &self.descriptors[position])
    }

    /// Descriptors in encounter order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.descriptors.iter()
    }

    /// Numeric ids ascending, then non-numeric ids in encounter order.
    pub fn presentation_order(&self) -> Vec<&FieldDescriptor> {
        let mut view: Vec<&FieldDescriptor> = self.descriptors.iter().collect();
        sort_by_presentation(&mut view, |descriptor| &descriptor.id);
        view
    }

    /// Descriptors usable as a row/folder identifier, in presentation order.
    pub fn identifier_candidates(&self) -> Vec<&FieldDescriptor> {
        self.presentation_order()
            .into_iter()
            .filter(|descriptor| IDENTIFIER_FIELD_IDS.contains(&descriptor.id.as_str()))
            .collect()
    }

    /// `"{id}: {name}"`, or `"{id}: Field {id}"` for unknown ids.
    pub fn label(&self, id: &FieldId) -> String {
        self.get(id)
            .map_or_else(|| format!("{id}: Field {id}"), FieldDescriptor::label)
    }

    /// Display name used for headers and folders.
    pub fn display_name(&self, id: &FieldId) -> String {
        self.get(id)
            .map_or_else(|| format!("Field {id}"), FieldDescriptor::display_name)
    }
}

/// Builds the catalog of fields whose kind is in `filter` (all kinds when `None`).
pub fn discover(records: &[EmployeeRecord], filter: Option<&[FieldKind]>) -> FieldCatalog {
    let mut catalog = FieldCatalog::default();
    for record in records {
        for field in record.fields() {
            if filter.is_some_and(|kinds| !kinds.contains(&field.kind())) {
                continue;
            }
            catalog.register(field.descriptor());
        }
    }
    debug!(
        records = records.len(),
        fields = catalog.len(),
        "field catalog discovered"
    );
    catalog
}

/// Kinds offered by the document export.
pub const DOCUMENT_KINDS: [FieldKind; 3] = [FieldKind::Single, FieldKind::Multiple, FieldKind::Photo];

#[cfg(test)]
mod tests {
    use staffport_model::{EmployeeField, FieldValue, Identity};

    use super::*;

    fn field(id: &str, name: &str, type_name: &str) -> EmployeeField {
        let kind = FieldKind::from_type_name(type_name);
        let value = match kind {
            FieldKind::Single => FieldValue::Single { current: None },
            FieldKind::Multiple => FieldValue::Multiple { current: vec![] },
            FieldKind::Photo => FieldValue::Photo { current: None },
            FieldKind::Other => FieldValue::Other { current: None },
            FieldKind::Text => FieldValue::Text { current: None },
        };
        EmployeeField {
            id: FieldId::new(id).expect("id"),
            name: name.to_string(),
            type_name: type_name.to_string(),
            value,
            history: vec![],
        }
    }

    fn record(username: &str, fields: Vec<EmployeeField>) -> EmployeeRecord {
        EmployeeRecord::new(
            Identity {
                username: username.to_string(),
                display_name: username.to_string(),
            },
            fields,
        )
    }

    #[test]
    fn first_observed_descriptor_wins() {
        let records = vec![
            record("a", vec![field("10", "Department", "TEXT")]),
            record("b", vec![field("10", "Dept (renamed)", "DOCUMENTSINGLE")]),
        ];
        let catalog = discover(&records, None);
        let descriptor = catalog.get(&FieldId::new("10").expect("id")).expect("10");
        assert_eq!(descriptor.name, "Department");
        assert_eq!(descriptor.kind, FieldKind::Text);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn filter_limits_kinds() {
        let records = vec![record(
            "a",
            vec![
                field("1", "Name", "TEXT"),
                field("200", "Contract", "DOCUMENTSINGLE"),
                field("300", "Photo", "PHOTO"),
            ],
        )];
        let catalog = discover(&records, Some(DOCUMENT_KINDS.as_slice()));
        let ids: Vec<&str> = catalog.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["200", "300"]);
    }

    #[test]
    fn presentation_order_leaves_catalog_untouched() {
        let records = vec![record(
            "a",
            vec![
                field("10", "Ten", "TEXT"),
                field("2", "Two", "TEXT"),
                field("abc", "Letters", "TEXT"),
                field("1", "One", "TEXT"),
            ],
        )];
        let catalog = discover(&records, None);
        let ordered: Vec<&str> = catalog
            .presentation_order()
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(ordered, vec!["1", "2", "10", "abc"]);
        let encounter: Vec<&str> = catalog.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(encounter, vec!["10", "2", "abc", "1"]);
    }

    #[test]
    fn identifier_candidates_and_labels() {
        let records = vec![record(
            "a",
            vec![
                field("47", "Employee number", "TEXT"),
                field("3", "Title", "TEXT"),
                field("7", "", "TEXT"),
            ],
        )];
        let catalog = discover(&records, None);
        let candidates: Vec<String> = catalog
            .identifier_candidates()
            .iter()
            .map(|d| d.label())
            .collect();
        assert_eq!(candidates, vec!["7: Field 7", "47: Employee number"]);
        assert_eq!(
            catalog.label(&FieldId::new("999").expect("id")),
            "999: Field 999"
        );
    }

    #[test]
    fn empty_records_give_empty_catalog() {
        let catalog = discover(&[], None);
        assert!(catalog.is_empty());
        assert!(catalog.presentation_order().is_empty());
    }
}
