///
/// This module implements the CLI interface for md-portal: argument parsing,
/// configuration layering and the user-visible summary.
///
/// All conversion logic (discovery, normalization, diagrams, rendering,
/// assembly) lives in the library modules; this module is glue only.
///
/// ## How To Use
/// - For command-line users: run `md-portal` inside the documents directory.
///   No arguments are required.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`Cli`]: struct.Cli.html
/// [`run`]: fn.run.html
use crate::convert::convert_all;
use crate::load_config::load_config;
use crate::render::CmarkRenderer;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// Convert the Markdown documents of a directory into portal HTML pages.
#[derive(Parser, Debug, Default)]
#[clap(
    name = "md-portal",
    version,
    about = "Convert a directory of Markdown documents into styled HTML pages for the documentation portal"
)]
pub struct Cli {
    /// Optional YAML config file
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the Markdown files (defaults to the current directory)
    #[clap(long)]
    pub dir: Option<PathBuf>,

    /// Directory the HTML pages are written to (relative to the current directory)
    #[clap(long)]
    pub output_dir: Option<PathBuf>,

    /// Do not print progress lines
    #[clap(long)]
    pub quiet: bool,

    /// Print the conversion report as JSON (implies --quiet)
    #[clap(long)]
    pub json: bool,
}

/// Extracted CLI logic entrypoint for integration tests and main()
pub fn run(cli: Cli) -> Result<()> {
    tracing::info!("run_started");

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(dir) = cli.dir {
        config.source_dir = dir;
    }
    // Relative paths from the command line are the caller's, not --dir's.
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = std::env::current_dir()
            .context("Failed to resolve the current directory")?
            .join(output_dir);
    }
    config.quiet |= cli.quiet || cli.json;

    let renderer = CmarkRenderer::new();
    match convert_all(&config, &renderer) {
        Ok(report) => {
            tracing::info!(
                converted = report.manifest.len(),
                skipped = report.skipped.len(),
                "run_finished"
            );
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "run_failed");
            Err(anyhow::Error::new(e).context("Conversion failed"))
        }
    }
}
