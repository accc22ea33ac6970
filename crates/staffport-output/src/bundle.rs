//! In-memory zip bundling of named artifacts.

use std::collections::HashMap;
use std::io::{Cursor, Write};

use tracing::{debug, warn};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use staffport_model::ExportArtifact;

use crate::error::{OutputError, Result};

/// First path segment of an artifact name; the whole name when it has none.
///
/// Document artifacts are named `folder/subject/file`, so only the field
/// folder reaches the log.
fn log_scope(name: &str) -> &str {
    name.split('/').next().unwrap_or(name)
}

/// Collapses artifacts with the same name so that the later one wins.
///
/// The surviving artifact keeps the position of the first occurrence.
fn coalesce(artifacts: &[ExportArtifact]) -> Vec<&ExportArtifact> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut unique: Vec<&ExportArtifact> = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        match positions.get(artifact.name()) {
            Some(&position) => {
                warn!(
                    scope = log_scope(artifact.name()),
                    "duplicate artifact name, keeping the later one"
                );
                unique[position] = artifact;
            }
            None => {
                positions.insert(artifact.name(), unique.len());
                unique.push(artifact);
            }
        }
    }
    unique
}

/// Writes every artifact into one deflate-compressed zip archive.
///
/// Names are used as given and bytes are stored unmodified. Any failure
/// discards the whole archive.
pub fn bundle(artifacts: &[ExportArtifact]) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for artifact in coalesce(artifacts) {
        zip.start_file(artifact.name(), options)?;
        zip.write_all(artifact.bytes())
            .map_err(|e| OutputError::Encoding(format!("{}: {e}", artifact.name())))?;
    }

    let bytes = zip.finish()?.into_inner();
    debug!(
        entries = artifacts.len(),
        bytes = bytes.len(),
        "archive bundled"
    );
    Ok(bytes)
}
