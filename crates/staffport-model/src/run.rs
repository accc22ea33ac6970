//! Per-run context and result accounting.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::FieldId;

/// Caller-supplied API credentials. The secret never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub domain: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(
        domain: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into().trim().to_string(),
            client_id: client_id.into().trim().to_string(),
            client_secret: client_secret.into().trim().to_string(),
        }
    }

    /// True when every part is filled in.
    pub fn is_complete(&self) -> bool {
        !(self.domain.is_empty() || self.client_id.is_empty() || self.client_secret.is_empty())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("domain", &self.domain)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Everything one export run needs, built once and passed explicitly.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub credentials: Credentials,
    pub include_inactive: bool,
    /// Field whose value labels rows and folders; username when `None`.
    pub identifier: Option<FieldId>,
    pub selected_fields: Vec<FieldId>,
}

impl RunContext {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            include_inactive: false,
            identifier: None,
            selected_fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_include_inactive(mut self, include_inactive: bool) -> Self {
        self.include_inactive = include_inactive;
        self
    }

    #[must_use]
    pub fn with_identifier(mut self, identifier: Option<FieldId>) -> Self {
        self.identifier = identifier;
        self
    }

    #[must_use]
    pub fn with_selected_fields(mut self, fields: Vec<FieldId>) -> Self {
        self.selected_fields = fields;
        self
    }
}

/// An attempted item that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub subject: String,
    pub reason: String,
}

/// An item that could not be attempted at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipRecord {
    pub subject: String,
    pub reason: String,
}

/// Counts for one bulk run.
///
/// `items_succeeded + failures.len() + skipped.len() == items_expected`
/// always holds for results produced by the retriever.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub items_expected: usize,
    pub items_succeeded: usize,
    pub failures: Vec<FailureRecord>,
    pub skipped: Vec<SkipRecord>,
}

impl RunResult {
    /// Items that were actually handed to the fetcher.
    pub fn attempted(&self) -> usize {
        self.items_expected.saturating_sub(self.skipped.len())
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// True when every expected item is accounted for exactly once.
    pub fn is_balanced(&self) -> bool {
        self.items_succeeded + self.failures.len() + self.skipped.len() == self.items_expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_redacts_secret() {
        let credentials = Credentials::new(" acme.sb ", "client", "s3cret");
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("acme.sb"));
        assert!(!rendered.contains("s3cret"));
        assert!(credentials.is_complete());
        assert!(!Credentials::new("acme", "", "x").is_complete());
    }

    #[test]
    fn run_result_accounting() {
        let result = RunResult {
            items_expected: 3,
            items_succeeded: 1,
            failures: vec![FailureRecord {
                subject: "ada fid 201 idx 0".to_string(),
                reason: "404".to_string(),
            }],
            skipped: vec![SkipRecord {
                subject: "ada fid 201 idx 2".to_string(),
                reason: "no retrieval link".to_string(),
            }],
        };
        assert_eq!(result.attempted(), 2);
        assert_eq!(result.failed(), 1);
        assert!(result.is_balanced());
        assert!(RunResult::default().is_balanced());
    }
}
