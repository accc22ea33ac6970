#![deny(unsafe_code)]

use std::cmp::Ordering;
use std::fmt;

use crate::ModelError;

/// Opaque field identifier assigned by the upstream platform.
///
/// Ids are compared as strings everywhere except display ordering, where
/// [`FieldId::presentation_cmp`] sorts purely numeric ids ascending and places
/// everything else after them.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidFieldId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the id when it consists of ASCII digits only.
    pub fn numeric(&self) -> Option<u64> {
        if self.0.is_empty() || !self.0.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.0.parse().ok()
    }

    /// Presentation ordering: numeric ascending, non-numeric last.
    ///
    /// Two non-numeric ids (or two ids with equal numeric value) compare equal,
    /// so a stable sort keeps their encounter order.
    pub fn presentation_cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FieldId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Stable-sorts `items` into presentation order by the id `key` returns.
pub fn sort_by_presentation<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> &FieldId,
{
    items.sort_by(|a, b| key(a).presentation_cmp(key(b)));
}
