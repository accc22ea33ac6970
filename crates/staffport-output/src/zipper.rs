//! Per-folder and per-photo zip archives on disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use staffport_model::ExportArtifact;

use crate::bundle::bundle;
use crate::error::{OutputError, Result};

/// Image extensions picked up in photo mode.
pub const PHOTO_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "gif"];

/// Totals for one zipper run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZipSummary {
    pub processed: usize,
    pub compressed: usize,
    pub failed: usize,
}

/// Directory entries of `dir`, sorted by file name.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| OutputError::io(dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| OutputError::io(dir, e))?;
        paths.push(entry.path());
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

fn prepare_output(root: &Path, out: &Path) -> Result<()> {
    if !root.is_dir() {
        return Err(OutputError::io(
            root,
            std::io::Error::new(std::io::ErrorKind::NotFound, "root folder not found"),
        ));
    }
    fs::create_dir_all(out).map_err(|e| OutputError::io(out, e))
}

fn write_archive(target: &Path, artifacts: &[ExportArtifact]) -> Result<()> {
    let bytes = bundle(artifacts)?;
    fs::write(target, bytes).map_err(|e| OutputError::io(target, e))
}

/// Zips the direct files of one folder; returns how many were included.
fn zip_folder(folder: &Path, target: &Path) -> Result<usize> {
    let mut artifacts = Vec::new();
    for path in sorted_entries(folder)? {
        if !path.is_file() {
            continue;
        }
        let Some(name) = file_name(&path) else {
            continue;
        };
        match fs::read(&path) {
            Ok(bytes) => artifacts.push(ExportArtifact::new(name, bytes)),
            Err(error) => warn!(path = %path.display(), %error, "skipping unreadable file"),
        }
    }
    if artifacts.is_empty() {
        return Ok(0);
    }
    write_archive(target, &artifacts)?;
    Ok(artifacts.len())
}

/// Zips every all-digit subfolder of `root` into `out/<name>.zip`.
///
/// A folder that yields no files counts as failed.
pub fn zip_subfolders(root: &Path, out: &Path) -> Result<ZipSummary> {
    prepare_output(root, out)?;
    let mut summary = ZipSummary::default();
    for path in sorted_entries(root)? {
        let Some(name) = file_name(&path) else {
            continue;
        };
        if !path.is_dir() || name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        summary.processed += 1;
        let target = out.join(format!("{name}.zip"));
        match zip_folder(&path, &target) {
            Ok(0) => {
                warn!(folder = name, "folder has no files to compress");
                summary.failed += 1;
            }
            Ok(_) => summary.compressed += 1,
            Err(error) => {
                warn!(folder = name, %error, "failed to compress folder");
                summary.failed += 1;
            }
        }
    }
    info!(
        processed = summary.processed,
        compressed = summary.compressed,
        failed = summary.failed,
        "folder zipping finished"
    );
    Ok(summary)
}

fn is_photo(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| PHOTO_EXTENSIONS.iter().any(|p| ext.eq_ignore_ascii_case(p)))
}

/// Zips every image file in `root` individually into `out/<stem>.zip`.
pub fn zip_photos(root: &Path, out: &Path) -> Result<ZipSummary> {
    prepare_output(root, out)?;
    let mut summary = ZipSummary::default();
    for path in sorted_entries(root)? {
        if !path.is_file() || !is_photo(&path) {
            continue;
        }
        let Some(name) = file_name(&path) else {
            continue;
        };
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        summary.processed += 1;
        let target = out.join(format!("{stem}.zip"));
        let outcome = fs::read(&path)
            .map_err(|e| OutputError::io(&path, e))
            .and_then(|bytes| write_archive(&target, &[ExportArtifact::new(name, bytes)]));
        match outcome {
            Ok(()) => summary.compressed += 1,
            Err(error) => {
                warn!(photo = name, %error, "failed to compress photo");
                summary.failed += 1;
            }
        }
    }
    info!(
        processed = summary.processed,
        compressed = summary.compressed,
        failed = summary.failed,
        "photo zipping finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_extensions_are_case_insensitive() {
        assert!(is_photo(Path::new("a/B.JPG")));
        assert!(is_photo(Path::new("x.jpeg")));
        assert!(!is_photo(Path::new("x.pdf")));
        assert!(!is_photo(Path::new("gif")));
    }
}
