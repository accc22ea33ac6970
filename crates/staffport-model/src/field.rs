//! Field kinds, descriptors and the tagged field-value union.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::FieldId;

/// Upstream type tag for single-document fields.
pub const TYPE_DOCUMENT_SINGLE: &str = "DOCUMENTSINGLE";
/// Upstream type tag for multi-document fields.
pub const TYPE_DOCUMENT_MULTIPLE: &str = "DOCUMENTMULTIPLE";
/// Upstream type tag for photo fields.
pub const TYPE_PHOTO: &str = "PHOTO";

/// Extension used when a document payload does not declare one.
pub const DEFAULT_EXTENSION: &str = "dat";

/// Semantic category of a field's payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldKind {
    /// Scalar or list values with timeline history.
    Text,
    /// One document.
    Single,
    /// A list of documents.
    Multiple,
    /// One photo.
    Photo,
    /// Field without a declared type.
    Other,
}

impl FieldKind {
    /// Classify an upstream `type` tag.
    pub fn from_type_name(type_name: &str) -> Self {
        let trimmed = type_name.trim();
        if trimmed.is_empty() {
            return Self::Other;
        }
        match trimmed.to_ascii_uppercase().as_str() {
            TYPE_DOCUMENT_SINGLE => Self::Single,
            TYPE_DOCUMENT_MULTIPLE => Self::Multiple,
            TYPE_PHOTO => Self::Photo,
            _ => Self::Text,
        }
    }

    /// True for the three document-bearing kinds.
    pub const fn is_document(self) -> bool {
        matches!(self, Self::Single | Self::Multiple | Self::Photo)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Single => "Single document",
            Self::Multiple => "Multiple documents",
            Self::Photo => "Photo",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Catalog entry describing one field id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: FieldId,
    /// Declared name. Not unique across ids.
    pub name: String,
    pub kind: FieldKind,
    /// Raw upstream type tag, kept for overview exports.
    pub type_name: String,
}

impl FieldDescriptor {
    /// Name for folders and headers; falls back to `Field {id}` when blank.
    pub fn display_name(&self) -> String {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            format!("Field {}", self.id)
        } else {
            trimmed.to_string()
        }
    }

    /// `"{id}: {name}"` selection label.
    pub fn label(&self) -> String {
        format!("{}: {}", self.id, self.display_name())
    }
}

/// Payload of a single timeline entry before export-time resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EntryValue {
    /// One value, optionally with an alternate export representation.
    Scalar {
        value: Option<String>,
        alternative_export_value: Option<String>,
    },
    /// Multi-valued entry.
    List(Vec<String>),
    /// Missing or malformed payload.
    #[default]
    Missing,
}

impl EntryValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar {
            value: Some(value.into()),
            alternative_export_value: None,
        }
    }

    /// Resolve to cell text. Scalars prefer the primary value over the alternate
    /// export value; lists are joined with `delimiter`.
    pub fn resolve(&self, delimiter: &str) -> String {
        match self {
            Self::Scalar {
                value,
                alternative_export_value,
            } => non_blank(value.as_deref())
                .or_else(|| non_blank(alternative_export_value.as_deref()))
                .unwrap_or_default()
                .to_string(),
            Self::List(values) => values.join(delimiter),
            Self::Missing => String::new(),
        }
    }

    /// The primary scalar value, if any.
    pub fn primary(&self) -> Option<&str> {
        match self {
            Self::Scalar { value, .. } => non_blank(value.as_deref()),
            _ => None,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

/// One historical value with its validity interval.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimelineEntry {
    pub valid_from: Option<String>,
    /// `None` means the entry is still in effect.
    pub valid_to: Option<String>,
    pub value: EntryValue,
}

impl TimelineEntry {
    /// True when the entry has no end date.
    pub fn is_open(&self) -> bool {
        self.valid_to.as_deref().is_none_or(str::is_empty)
    }
}

/// A binary document reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPayload {
    /// `None` when the document cannot be downloaded.
    pub retrieval_link: Option<String>,
    pub extension: String,
    pub title: Option<String>,
}

impl DocumentPayload {
    pub fn is_retrievable(&self) -> bool {
        self.retrieval_link.is_some()
    }
}

/// Tagged field value, keyed by kind.
///
/// Timeline history lives on [`crate::EmployeeField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text {
        current: Option<TimelineEntry>,
    },
    Single {
        current: Option<DocumentPayload>,
    },
    Multiple {
        current: Vec<DocumentPayload>,
    },
    Photo {
        current: Option<DocumentPayload>,
    },
    /// Untyped field; the current value is read the same way as for text.
    Other {
        current: Option<TimelineEntry>,
    },
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text { .. } => FieldKind::Text,
            Self::Single { .. } => FieldKind::Single,
            Self::Multiple { .. } => FieldKind::Multiple,
            Self::Photo { .. } => FieldKind::Photo,
            Self::Other { .. } => FieldKind::Other,
        }
    }

    /// Current scalar value of a text or untyped field.
    pub fn current_text(&self) -> Option<&str> {
        match self {
            Self::Text {
                current: Some(entry),
            }
            | Self::Other {
                current: Some(entry),
            } => entry.value.primary(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_upstream_types() {
        assert_eq!(FieldKind::from_type_name("DOCUMENTSINGLE"), FieldKind::Single);
        assert_eq!(
            FieldKind::from_type_name("documentmultiple"),
            FieldKind::Multiple
        );
        assert_eq!(FieldKind::from_type_name("PHOTO"), FieldKind::Photo);
        assert_eq!(FieldKind::from_type_name("DATE"), FieldKind::Text);
        assert_eq!(FieldKind::from_type_name(""), FieldKind::Other);
    }

    #[test]
    fn scalar_prefers_primary_value() {
        let value = EntryValue::Scalar {
            value: Some("Primary".to_string()),
            alternative_export_value: Some("ALT".to_string()),
        };
        assert_eq!(value.resolve(";"), "Primary");

        let value = EntryValue::Scalar {
            value: Some(String::new()),
            alternative_export_value: Some("ALT".to_string()),
        };
        assert_eq!(value.resolve(";"), "ALT");
    }

    #[test]
    fn list_joins_with_delimiter() {
        let value = EntryValue::List(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(value.resolve("|"), "a|b");
        assert_eq!(EntryValue::Missing.resolve(";"), "");
    }

    #[test]
    fn blank_valid_to_is_open() {
        let entry = TimelineEntry {
            valid_to: Some(String::new()),
            ..TimelineEntry::default()
        };
        assert!(entry.is_open());
        let closed = TimelineEntry {
            valid_to: Some("2021-01-01".to_string()),
            ..TimelineEntry::default()
        };
        assert!(!closed.is_open());
    }
}
