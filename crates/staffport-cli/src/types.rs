use std::path::PathBuf;

use staffport_export::DocumentCounts;
use staffport_model::{FieldDescriptor, FieldId, RunResult};
use staffport_output::ZipSummary;

#[derive(Debug)]
pub struct FieldsResult {
    pub records: usize,
    /// Presentation order.
    pub fields: Vec<FieldDescriptor>,
    pub identifier_candidates: Vec<FieldId>,
    pub warnings: Vec<String>,
}

#[derive(Debug)]
pub struct HistoryResult {
    pub archive: PathBuf,
    pub records: usize,
    pub tables: Vec<TableSummary>,
    pub extra_files: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug)]
pub struct TableSummary {
    pub file_name: String,
    pub field_label: String,
    pub rows: usize,
}

#[derive(Debug)]
pub struct CountResult {
    pub records: usize,
    pub fields: Vec<String>,
    pub counts: DocumentCounts,
    pub warnings: Vec<String>,
}

#[derive(Debug)]
pub struct DownloadResult {
    pub destination: PathBuf,
    pub records: usize,
    pub run: RunResult,
    pub warnings: Vec<String>,
}

#[derive(Debug)]
pub struct OverviewResult {
    pub workbook: PathBuf,
    pub employee_fields: usize,
    pub lists: usize,
    pub organizations: usize,
    pub warnings: Vec<String>,
}

#[derive(Debug)]
pub struct ZipResult {
    pub mode: &'static str,
    pub output_dir: PathBuf,
    pub summary: ZipSummary,
}
