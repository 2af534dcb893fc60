//! High-level pipeline: discovers documents and converts each one to a page.
//!
//! For every discovered document, in order:
//!   - read the Markdown source
//!   - pull indented code fences flush left ([`crate::normalize`])
//!   - swap mermaid blocks for placeholders ([`crate::diagram::extract_diagrams`])
//!   - render through the injected [`MarkdownRenderer`]
//!   - put the diagrams back ([`crate::diagram::restore_diagrams`])
//!   - fill the page template and write `<stem>.html` ([`crate::assemble`])
//!
//! # Major Types
//! - [`ConversionReport`]: manifest of written pages, skipped documents and
//!   the initial page selection
//!
//! # Error Handling
//! Discovery, output directory and write failures end the run. Read, render
//! and diagram failures end it under [`FailurePolicy::Abort`] and are skipped
//! with a warning under [`FailurePolicy::Skip`].
//!
//! # Navigation
//! - Main entrypoint: [`convert_all`]
//! - Single-document core: [`convert_markdown`]

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::assemble::{assemble_page, write_page};
use crate::config::{FailurePolicy, PortalConfig};
use crate::contract::{ConversionEntry, ConversionManifest, Document, InitialPage, MarkdownRenderer};
use crate::diagram::{extract_diagrams, restore_diagrams};
use crate::discover::discover;
use crate::error::ConvertError;
use crate::normalize::normalize_code_blocks;

#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub discovered: usize,
    pub output_dir: PathBuf,
    pub manifest: ConversionManifest,
    pub skipped: Vec<SkippedDocument>,
    pub initial_page: InitialPage,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedDocument {
    pub source_name: String,
    pub reason: String,
}

enum Outcome {
    Written(ConversionEntry, PathBuf),
    Skipped(SkippedDocument),
}

/// Markdown source to HTML fragment, diagrams included.
pub fn convert_markdown<R>(markdown: &str, renderer: &R, path: &Path) -> Result<String, ConvertError>
where
    R: MarkdownRenderer + ?Sized,
{
    let normalized = normalize_code_blocks(markdown);
    let extraction = extract_diagrams(&normalized);
    debug!(
        path = %path.display(),
        diagrams = extraction.diagrams.len(),
        "Extracted diagram blocks"
    );

    let html = renderer
        .render(&extraction.markdown)
        .map_err(|e| ConvertError::Render {
            path: path.to_path_buf(),
            source: e,
        })?;

    restore_diagrams(&html, &extraction.diagrams).map_err(|e| ConvertError::Diagram {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Runs the whole conversion according to `config`.
pub fn convert_all<R>(config: &PortalConfig, renderer: &R) -> Result<ConversionReport, ConvertError>
where
    R: MarkdownRenderer + ?Sized,
{
    info!("[CONVERT] Starting conversion run");

    let documents = discover(config.source_dir(), &config.primary_name)?;
    say(config, format!("Found {} markdown files:", documents.len()));

    let output_dir = config.resolved_output_dir();
    fs::create_dir_all(&output_dir).map_err(|e| {
        error!(error = ?e, dir = %output_dir.display(), "[CONVERT][ERROR] Failed to create output directory");
        ConvertError::CreateOutputDir {
            dir: output_dir.clone(),
            source: e,
        }
    })?;

    let mut manifest = ConversionManifest::default();
    let mut skipped = Vec::new();
    let mut claimed: HashSet<String> = HashSet::new();

    for document in &documents {
        match convert_one(config, renderer, document, &output_dir, &mut claimed)? {
            Outcome::Written(entry, path) => {
                say(config, format!("  \u{2713} Created {}", path.display()));
                manifest.push(entry);
            }
            Outcome::Skipped(skip) => {
                say(config, format!("  ! Skipped {}: {}", skip.source_name, skip.reason));
                skipped.push(skip);
            }
        }
    }

    let initial_page = manifest.initial_page();
    let output_dir = fs::canonicalize(&output_dir).unwrap_or(output_dir);
    info!(
        converted = manifest.len(),
        skipped = skipped.len(),
        initial_page = %initial_page,
        "[CONVERT] Conversion run complete"
    );

    say(config, String::new());
    say(config, "Conversion complete!".to_string());
    say(config, format!("HTML files saved in: {}", output_dir.display()));
    say(config, format!("Initial page: {initial_page}"));

    Ok(ConversionReport {
        discovered: documents.len(),
        output_dir,
        manifest,
        skipped,
        initial_page,
    })
}

fn convert_one<R>(
    config: &PortalConfig,
    renderer: &R,
    document: &Document,
    output_dir: &Path,
    claimed: &mut HashSet<String>,
) -> Result<Outcome, ConvertError>
where
    R: MarkdownRenderer + ?Sized,
{
    let source_name = document.file_name();
    let output_name = document.output_name();
    say(config, format!("Converting {source_name}..."));

    if claimed.contains(&output_name) {
        warn!(
            source = %document.path().display(),
            output = %output_name,
            "[CONVERT] Output name already produced earlier in this run, skipping"
        );
        return Ok(Outcome::Skipped(SkippedDocument {
            source_name,
            reason: format!("{output_name} was already written by an earlier document"),
        }));
    }

    let fragment = match read_and_convert(renderer, document) {
        Ok(fragment) => fragment,
        Err(e) if config.on_error == FailurePolicy::Skip && e.is_per_document() => {
            warn!(source = %document.path().display(), error = %e, "[CONVERT] Skipping document");
            return Ok(Outcome::Skipped(SkippedDocument {
                source_name,
                reason: e.to_string(),
            }));
        }
        Err(e) => {
            error!(source = %document.path().display(), error = %e, "[CONVERT][ERROR] Conversion failed");
            return Err(e);
        }
    };

    let title = document.title();
    let page = assemble_page(&title, &fragment);
    let path = write_page(output_dir, &output_name, &page)?;
    claimed.insert(output_name.clone());

    info!(
        source = %source_name,
        output = %path.display(),
        "[CONVERT] Document converted"
    );
    Ok(Outcome::Written(
        ConversionEntry {
            source_name,
            title,
            output_name,
            designation: document.designation,
        },
        path,
    ))
}

fn read_and_convert<R>(renderer: &R, document: &Document) -> Result<String, ConvertError>
where
    R: MarkdownRenderer + ?Sized,
{
    let markdown = fs::read_to_string(document.path()).map_err(|e| ConvertError::Read {
        path: document.path.clone(),
        source: e,
    })?;
    convert_markdown(&markdown, renderer, document.path())
}

fn say(config: &PortalConfig, line: String) {
    if !config.quiet {
        println!("{line}");
    }
}
