//! Destinations for retrieved documents.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use staffport_export::{DocumentSink, RetrievalTask};
use staffport_model::ExportArtifact;

use crate::error::{OutputError, Result};

/// Makes a folder or subject name safe to use as one path segment.
///
/// Path separators become `_`; empty, `.` and `..` become `_`.
pub fn path_segment(name: &str) -> String {
    let replaced: String = name
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect();
    match replaced.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => replaced,
    }
}

fn segments(task: &RetrievalTask) -> [String; 3] {
    [
        path_segment(&task.folder),
        path_segment(&task.subject),
        path_segment(&task.file_name),
    ]
}

/// Writes documents to `root/<folder>/<subject>/<file>`.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write(&mut self, task: &RetrievalTask, bytes: &[u8]) -> Result<()> {
        let [folder, subject, file] = segments(task);
        let dir = self.root.join(&folder).join(subject);
        fs::create_dir_all(&dir).map_err(|e| OutputError::io(&dir, e))?;
        let path = dir.join(file);
        fs::write(&path, bytes).map_err(|e| OutputError::io(&path, e))?;
        debug!(folder = %folder, bytes = bytes.len(), "document written");
        self.written.push(path);
        Ok(())
    }
}

impl DocumentSink for DirectorySink {
    type Error = OutputError;

    fn store(&mut self, task: &RetrievalTask, bytes: Vec<u8>) -> Result<()> {
        self.write(task, &bytes)
    }
}

/// Collects documents as artifacts named `folder/subject/file`.
#[derive(Debug, Clone, Default)]
pub struct ArchiveSink {
    artifacts: Vec<ExportArtifact>,
}

impl ArchiveSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artifacts(&self) -> &[ExportArtifact] {
        &self.artifacts
    }

    pub fn into_artifacts(self) -> Vec<ExportArtifact> {
        self.artifacts
    }
}

impl DocumentSink for ArchiveSink {
    type Error = OutputError;

    fn store(&mut self, task: &RetrievalTask, bytes: Vec<u8>) -> Result<()> {
        let name = segments(task).join("/");
        self.artifacts.push(ExportArtifact::new(name, bytes));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutralises_separators_and_dot_segments() {
        assert_eq!(path_segment("HR/Payroll"), "HR_Payroll");
        assert_eq!(path_segment(".."), "_");
        assert_eq!(path_segment("  "), "_");
        assert_eq!(path_segment("a\\b"), "a_b");
        assert_eq!(path_segment("Contract.pdf"), "Contract.pdf");
    }
}
