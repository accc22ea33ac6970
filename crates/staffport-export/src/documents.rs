//! Document location and sequential bulk retrieval.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use staffport_model::{
    DocumentPayload, EmployeeRecord, FailureRecord, FieldId, FieldKind, FieldValue, RunResult,
    SkipRecord,
};

use crate::discovery::FieldCatalog;

/// Reason recorded for payloads that carry no retrieval link.
pub const NO_LINK_REASON: &str = "no retrieval link";

/// One document to fetch and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalTask {
    /// Field display name; first path segment.
    pub folder: String,
    /// Identifier value or username; second path segment.
    pub subject: String,
    pub username: String,
    pub field_id: FieldId,
    /// Position within a multiple-document field.
    pub index: Option<usize>,
    pub link: String,
    pub file_name: String,
}

impl RetrievalTask {
    /// `folder/subject/file` with `/` separators.
    pub fn relative_path(&self) -> String {
        format!("{}/{}/{}", self.folder, self.subject, self.file_name)
    }

    /// Subject line used in failure reports.
    pub fn describe(&self) -> String {
        describe(&self.username, &self.field_id, self.index)
    }
}

fn describe(username: &str, field_id: &FieldId, index: Option<usize>) -> String {
    match index {
        Some(index) => format!("{username} fid {field_id} idx {index}"),
        None => format!("{username} fid {field_id}"),
    }
}

/// Everything found for a retrieval run, before any fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievalPlan {
    pub tasks: Vec<RetrievalTask>,
    /// Payloads that were found but cannot be fetched.
    pub skipped: Vec<SkipRecord>,
}

impl RetrievalPlan {
    /// Every payload encountered, fetchable or not.
    pub fn items_expected(&self) -> usize {
        self.tasks.len() + self.skipped.len()
    }
}

/// Per-kind document counts for the selected fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentCounts {
    pub single: usize,
    pub multiple: usize,
    pub photo: usize,
}

impl DocumentCounts {
    pub fn total(&self) -> usize {
        self.single + self.multiple + self.photo
    }
}

/// Keeps alphanumerics, space, `_` and `-`, then trims trailing whitespace.
pub fn sanitize_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();
    kept.trim_end().to_string()
}

fn file_stem_for(payload: &DocumentPayload, field_id: &FieldId, index: Option<usize>) -> String {
    let fallback = match index {
        Some(index) => format!("{field_id}_{index}"),
        None => field_id.to_string(),
    };
    let title = payload
        .title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(&fallback);
    let stem = sanitize_title(title);
    if stem.is_empty() {
        sanitize_title(&fallback)
    } else {
        stem
    }
}

/// `{stem}.{extension}`, with `_2`, `_3`, ... appended to the stem while the
/// path under `folder/subject` is already planned. Comparison ignores case.
fn unique_file_name(
    used: &mut HashSet<(String, String, String)>,
    folder: &str,
    subject: &str,
    stem: &str,
    extension: &str,
) -> String {
    let mut name = format!("{stem}.{extension}");
    let mut counter = 2usize;
    while !used.insert((
        folder.to_lowercase(),
        subject.to_lowercase(),
        name.to_lowercase(),
    )) {
        name = format!("{stem}_{counter}.{extension}");
        counter += 1;
    }
    name
}

/// Payloads of a document field, each with its index for multiple fields.
fn payloads(value: &FieldValue) -> Vec<(Option<usize>, &DocumentPayload)> {
    match value {
        FieldValue::Single {
            current: Some(payload),
        }
        | FieldValue::Photo {
            current: Some(payload),
        } => vec![(None, payload)],
        FieldValue::Multiple { current } => current
            .iter()
            .enumerate()
            .map(|(index, payload)| (Some(index), payload))
            .collect(),
        _ => Vec::new(),
    }
}

/// Enumerates one task per retrievable document of the selected fields.
///
/// Records are walked in order, then selected fields in order. Payloads
/// without a link are recorded as skipped. File names are unique within
/// each folder and subject.
pub fn plan_retrieval(
    records: &[EmployeeRecord],
    catalog: &FieldCatalog,
    identifier: Option<&FieldId>,
    selected: &[FieldId],
) -> RetrievalPlan {
    let mut plan = RetrievalPlan::default();
    let mut used = HashSet::new();
    for record in records {
        let subject = record.subject_name(identifier);
        for field_id in selected {
            let Some(field) = record.field(field_id) else {
                continue;
            };
            let folder = catalog.display_name(field_id);
            for (index, payload) in payloads(&field.value) {
                let Some(link) = payload.retrieval_link.clone() else {
                    plan.skipped.push(SkipRecord {
                        subject: describe(record.username(), field_id, index),
                        reason: NO_LINK_REASON.to_string(),
                    });
                    continue;
                };
                let file_name = unique_file_name(
                    &mut used,
                    &folder,
                    &subject,
                    &file_stem_for(payload, field_id, index),
                    &payload.extension,
                );
                plan.tasks.push(RetrievalTask {
                    folder: folder.clone(),
                    subject: subject.clone(),
                    username: record.username().to_string(),
                    field_id: field_id.clone(),
                    index,
                    link,
                    file_name,
                });
            }
        }
    }
    debug!(
        tasks = plan.tasks.len(),
        skipped = plan.skipped.len(),
        "retrieval planned"
    );
    plan
}

/// Counts documents per kind without fetching anything.
pub fn count_documents(records: &[EmployeeRecord], selected: &[FieldId]) -> DocumentCounts {
    let mut counts = DocumentCounts::default();
    for record in records {
        for field_id in selected {
            let Some(field) = record.field(field_id) else {
                continue;
            };
            let found = payloads(&field.value).len();
            match field.kind() {
                FieldKind::Single => counts.single += found,
                FieldKind::Multiple => counts.multiple += found,
                FieldKind::Photo => counts.photo += found,
                FieldKind::Text | FieldKind::Other => {}
            }
        }
    }
    counts
}

/// Downloads the bytes behind a retrieval link.
pub trait DocumentFetcher {
    type Error: fmt::Display;

    fn fetch(&mut self, link: &str) -> Result<Vec<u8>, Self::Error>;
}

impl<F, E> DocumentFetcher for F
where
    F: FnMut(&str) -> Result<Vec<u8>, E>,
    E: fmt::Display,
{
    type Error = E;

    fn fetch(&mut self, link: &str) -> Result<Vec<u8>, E> {
        self(link)
    }
}

/// Receives fetched documents.
pub trait DocumentSink {
    type Error: fmt::Display;

    fn store(&mut self, task: &RetrievalTask, bytes: Vec<u8>) -> Result<(), Self::Error>;
}

/// Observer notified after each task, e.g. for progress display.
pub trait RetrievalObserver {
    fn on_task_finished(&mut self, task: &RetrievalTask, succeeded: bool);
}

impl RetrievalObserver for () {
    fn on_task_finished(&mut self, _task: &RetrievalTask, _succeeded: bool) {}
}

/// Runs every task once, strictly in order.
///
/// A failed fetch or store is recorded against that task only; the run always
/// continues with the next one.
pub fn execute<F, S, O>(
    plan: &RetrievalPlan,
    fetcher: &mut F,
    sink: &mut S,
    observer: &mut O,
) -> RunResult
where
    F: DocumentFetcher,
    S: DocumentSink,
    O: RetrievalObserver,
{
    let span = info_span!("retrieve", tasks = plan.tasks.len());
    let _guard = span.enter();

    let mut result = RunResult {
        items_expected: plan.items_expected(),
        skipped: plan.skipped.clone(),
        ..RunResult::default()
    };

    for task in &plan.tasks {
        let outcome = fetcher
            .fetch(&task.link)
            .map_err(|e| e.to_string())
            .and_then(|bytes| sink.store(task, bytes).map_err(|e| e.to_string()));
        match outcome {
            Ok(()) => {
                result.items_succeeded += 1;
                observer.on_task_finished(task, true);
            }
            Err(reason) => {
                warn!(
                    field = %task.field_id,
                    index = ?task.index,
                    %reason,
                    "document retrieval failed"
                );
                result.failures.push(FailureRecord {
                    subject: task.describe(),
                    reason,
                });
                observer.on_task_finished(task, false);
            }
        }
    }

    info!(
        expected = result.items_expected,
        succeeded = result.items_succeeded,
        failed = result.failed(),
        skipped = result.skipped.len(),
        "document retrieval finished"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(title: Option<&str>, extension: &str) -> DocumentPayload {
        DocumentPayload {
            retrieval_link: Some("https://h/doc".to_string()),
            extension: extension.to_string(),
            title: title.map(str::to_string),
        }
    }

    #[test]
    fn sanitize_keeps_allowed_characters() {
        assert_eq!(
            sanitize_title("Contract: 2020/21 (signed)  "),
            "Contract 202021 signed"
        );
        assert_eq!(sanitize_title("a_b-c"), "a_b-c");
        assert_eq!(sanitize_title("Ærø résumé"), "Ærø résumé");
    }

    #[test]
    fn file_names_fall_back_to_field_id() {
        let id = FieldId::new("201").expect("id");
        assert_eq!(file_stem_for(&payload(None, "pdf"), &id, Some(2)), "201_2");
        assert_eq!(file_stem_for(&payload(Some("  "), "dat"), &id, None), "201");
        assert_eq!(file_stem_for(&payload(Some("///"), "png"), &id, None), "201");
        assert_eq!(
            file_stem_for(&payload(Some("Offer letter"), "docx"), &id, None),
            "Offer letter"
        );
    }

    #[test]
    fn repeated_names_get_a_counter_per_subject_folder() {
        let mut used = HashSet::new();
        let mut name = |subject: &str, stem: &str| {
            unique_file_name(&mut used, "Certificates", subject, stem, "pdf")
        };
        assert_eq!(name("ada", "Certificate"), "Certificate.pdf");
        assert_eq!(name("ada", "Certificate"), "Certificate_2.pdf");
        assert_eq!(name("ada", "certificate"), "certificate_3.pdf");
        assert_eq!(name("bob", "Certificate"), "Certificate.pdf");
    }

    #[test]
    fn describe_matches_failure_format() {
        let id = FieldId::new("200").expect("id");
        assert_eq!(describe("ada", &id, None), "ada fid 200");
        assert_eq!(describe("ada", &id, Some(1)), "ada fid 200 idx 1");
    }
}
