//! Export engine for employee records.
//!
//! Three phases run strictly in order over an immutable set of
//! [`EmployeeRecord`](staffport_model::EmployeeRecord)s:
//!
//! 1. [`discover`] builds a [`FieldCatalog`] from the fields the records declare.
//! 2. [`extract_timelines`] turns the selected text fields into row tables.
//! 3. [`plan_retrieval`] and [`execute`] locate documents and fetch them one by
//!    one through a [`DocumentFetcher`] into a [`DocumentSink`].
//!
//! Nothing in this crate performs I/O on its own.

pub mod discovery;
pub mod documents;
pub mod error;
pub mod timeline;

pub use discovery::{DOCUMENT_KINDS, FieldCatalog, IDENTIFIER_FIELD_IDS, discover};
pub use documents::{
    DocumentCounts, DocumentFetcher, DocumentSink, NO_LINK_REASON, RetrievalObserver,
    RetrievalPlan, RetrievalTask, count_documents, execute, plan_retrieval, sanitize_title,
};
pub use error::{ExportError, Result};
pub use timeline::{
    DEFAULT_DELIMITER, DEFAULT_PREFIX, TimelineOptions, TimelineRow, TimelineTable,
    extract_timelines, safe_file_stem,
};
