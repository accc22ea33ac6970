//! Artifact encoders and document destinations.
//!
//! - **CSV / JSON**: timeline tables and the raw employee backup
//! - **Zip**: in-memory bundling of named artifacts
//! - **Workbook**: the field overview spreadsheet
//! - **Sinks**: directory and archive destinations for retrieved documents
//! - **Zipper**: per-folder and per-photo archives on disk

pub mod bundle;
pub mod error;
pub mod overview;
pub mod sinks;
pub mod tables;
pub mod zipper;

pub use bundle::bundle;
pub use error::{OutputError, Result};
pub use overview::{
    EMPLOYEE_SHEET, FieldOverview, LISTS_SHEET, ORGANIZATIONS_SHEET, OverviewEntry,
    build_overview, overview_file_name,
};
pub use sinks::{ArchiveSink, DirectorySink, path_segment};
pub use tables::{archive_name, json_backup, timeline_artifact, timeline_artifacts};
pub use zipper::{PHOTO_EXTENSIONS, ZipSummary, zip_photos, zip_subfolders};
