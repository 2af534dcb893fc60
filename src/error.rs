//! Error taxonomy for a conversion run.
//!
//! Library code returns these typed errors; the CLI boundary wraps them in
//! `anyhow::Error` for the final diagnostic.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while enumerating the source or parent directory.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to read directory {}: {source}", dir.display())]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to resolve directory {}: {source}", dir.display())]
    Resolve {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Broken pairing between extracted diagram blocks and placeholders found
/// in rendered output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiagramError {
    #[error("placeholder references diagram #{index}, which was never extracted")]
    MissingIndex { index: usize },
    #[error("diagram #{index} was restored {occurrences} times, expected exactly once")]
    NotRestored { index: usize, occurrences: usize },
}

/// Failure reported by a [`crate::contract::MarkdownRenderer`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("markdown rendering failed: {0}")]
pub struct RenderError(pub String);

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render {}: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },
    #[error("failed to restore diagrams in {}: {source}", path.display())]
    Diagram {
        path: PathBuf,
        #[source]
        source: DiagramError,
    },
    #[error("failed to create output directory {}: {source}", dir.display())]
    CreateOutputDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    /// Whether the `skip` policy may continue past this error.
    ///
    /// Discovery, output directory and write failures always end the run.
    pub fn is_per_document(&self) -> bool {
        matches!(
            self,
            ConvertError::Read { .. } | ConvertError::Render { .. } | ConvertError::Diagram { .. }
        )
    }
}
