//! # contract: shared data model and the renderer seam
//!
//! This module holds the plain data types that flow between the pipeline
//! stages and the single trait behind which the Markdown engine sits.
//!
//! ## Interface & Extensibility
//! - Implement [`MarkdownRenderer`] to swap the Markdown engine. The default
//!   implementation is [`crate::render::CmarkRenderer`].
//! - The trait is annotated for `mockall`, so orchestrator tests can script
//!   renderer output and failures without a real engine.
//!
//! ## Type Sources
//! - [`Document`] is produced by discovery and consumed by the orchestrator.
//! - [`ConversionManifest`] is built up one entry per written page.

use std::fmt;
use std::path::{Path, PathBuf};

use mockall::automock;
use serde::{Serialize, Serializer};

use crate::assemble::{derive_title, output_file_name};
use crate::error::RenderError;

/// Whether a document is the promoted primary page or an ordinary one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Designation {
    Primary,
    Ordinary,
}

/// An input Markdown file found by discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub designation: Designation,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, designation: Designation) -> Self {
        Self {
            path: path.into(),
            designation,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name including extension, e.g. `my-doc.md`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Display title derived from the file name, e.g. `My Doc`.
    pub fn title(&self) -> String {
        derive_title(&self.path)
    }

    /// Output page name, e.g. `my-doc.html`.
    pub fn output_name(&self) -> String {
        output_file_name(&self.path)
    }

    pub fn is_primary(&self) -> bool {
        self.designation == Designation::Primary
    }
}

/// One converted document in the run manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionEntry {
    pub source_name: String,
    pub title: String,
    pub output_name: String,
    pub designation: Designation,
}

/// Ordered record of every page written during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionManifest {
    pub entries: Vec<ConversionEntry>,
}

impl ConversionManifest {
    pub fn push(&mut self, entry: ConversionEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Page a navigation frame should show first: the primary document if it
    /// was converted, otherwise the first ordinary document.
    pub fn initial_page(&self) -> InitialPage {
        self.entries
            .iter()
            .find(|e| e.designation == Designation::Primary)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|e| e.designation == Designation::Ordinary)
            })
            .map(|e| InitialPage::Page(e.output_name.clone()))
            .unwrap_or(InitialPage::Blank)
    }
}

/// The page selected to be shown first, or none when nothing was converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitialPage {
    Page(String),
    Blank,
}

impl fmt::Display for InitialPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitialPage::Page(name) => f.write_str(name),
            InitialPage::Blank => f.write_str("about:blank"),
        }
    }
}

impl Serialize for InitialPage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Converts normalized Markdown (diagram blocks already replaced by
/// placeholders) into an HTML fragment.
///
/// Implementations must support tables and fenced code, emit heading
/// anchors, and highlight code with CSS classes rather than inline styles.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> Result<String, RenderError>;
}
