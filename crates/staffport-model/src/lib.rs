//! Data model for employee record exports.
//!
//! Upstream employee records carry a per-tenant field schema: ids, names,
//! types and cardinalities are only known at runtime. This crate turns the raw
//! JSON into a tagged [`FieldValue`] union, with timeline history kept on each
//! [`EmployeeField`].

pub mod artifact;
pub mod employee;
pub mod error;
pub mod field;
pub mod ids;
pub mod run;

pub use artifact::ExportArtifact;
pub use employee::{EmployeeField, EmployeeRecord, Identity};
pub use error::{ModelError, Result};
pub use field::{
    DEFAULT_EXTENSION, DocumentPayload, EntryValue, FieldDescriptor, FieldKind, FieldValue,
    TimelineEntry,
};
pub use ids::{FieldId, sort_by_presentation};
pub use run::{Credentials, FailureRecord, RunContext, RunResult, SkipRecord};
