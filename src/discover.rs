//! Finds the Markdown documents of one run.
//!
//! The working directory contributes every visible `*.md` file; its parent
//! contributes only the file named exactly like the primary document. The
//! primary always comes first, everything else follows in byte order of the
//! file name. Filesystem iteration order is never relied upon.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::contract::{Designation, Document};
use crate::error::DiscoveryError;

const MARKDOWN_EXTENSION: &str = ".md";

/// Discover documents in `source_dir` and the primary file in its parent.
pub fn discover(source_dir: &Path, primary_name: &str) -> Result<Vec<Document>, DiscoveryError> {
    let source_dir = fs::canonicalize(source_dir).map_err(|e| {
        error!(error = ?e, dir = %source_dir.display(), "Failed to resolve source directory");
        DiscoveryError::Resolve {
            dir: source_dir.to_path_buf(),
            source: e,
        }
    })?;
    info!(dir = %source_dir.display(), "Discovering markdown files");

    let mut ordinary = list_markdown_files(&source_dir)?;
    ordinary.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut documents = Vec::with_capacity(ordinary.len() + 1);

    // The filesystem root is its own parent; nothing to promote there.
    match source_dir.parent() {
        Some(parent) => {
            if let Some(primary) = find_primary(parent, primary_name)? {
                debug!(path = %primary.display(), "Found primary document in parent directory");
                documents.push(Document::new(primary, Designation::Primary));
            }
        }
        None => debug!("Source directory has no parent, skipping primary lookup"),
    }

    documents.extend(
        ordinary
            .into_iter()
            .map(|path| Document::new(path, Designation::Ordinary)),
    );

    info!(count = documents.len(), "Discovery complete");
    Ok(documents)
}

fn read_dir_entries(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let to_err = |e: std::io::Error| {
        error!(error = ?e, dir = %dir.display(), "Failed to read directory");
        DiscoveryError::ReadDir {
            dir: dir.to_path_buf(),
            source: e,
        }
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(to_err)? {
        paths.push(entry.map_err(to_err)?.path());
    }
    Ok(paths)
}

fn list_markdown_files(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut files = Vec::new();
    for path in read_dir_entries(dir)? {
        let Some(name) = path.file_name() else {
            continue;
        };
        let Some(name) = name.to_str() else {
            warn!(path = %path.display(), "Skipping file with non UTF-8 name");
            continue;
        };
        // Hidden files are not matched by `*.md`.
        if name.starts_with('.') || !name.ends_with(MARKDOWN_EXTENSION) {
            continue;
        }
        if !path.is_file() {
            debug!(path = %path.display(), "Skipping non-file entry");
            continue;
        }
        files.push(path);
    }
    Ok(files)
}

fn find_primary(parent: &Path, primary_name: &str) -> Result<Option<PathBuf>, DiscoveryError> {
    // Exact name match, also on case-insensitive filesystems.
    Ok(read_dir_entries(parent)?
        .into_iter()
        .find(|p| p.file_name().and_then(|n| n.to_str()) == Some(primary_name) && p.is_file()))
}
