use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_OUTPUT_DIR: &str = "html_output";
pub const DEFAULT_PRIMARY_NAME: &str = "README.md";

/// What to do when a single document cannot be read, rendered or restored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the run with a diagnostic.
    #[default]
    Abort,
    /// Log a warning, record the document as skipped and continue.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortalConfig {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub primary_name: String,
    pub on_error: FailurePolicy,
    pub quiet: bool,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            primary_name: DEFAULT_PRIMARY_NAME.to_string(),
            on_error: FailurePolicy::Abort,
            quiet: false,
        }
    }
}

impl PortalConfig {
    /// Output directory, resolved against the source directory when relative.
    pub fn resolved_output_dir(&self) -> PathBuf {
        if self.output_dir.is_absolute() {
            self.output_dir.clone()
        } else {
            self.source_dir.join(&self.output_dir)
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn trace_loaded(&self) {
        info!(
            source_dir = %self.source_dir.display(),
            output_dir = %self.output_dir.display(),
            primary_name = %self.primary_name,
            on_error = ?self.on_error,
            "Loaded PortalConfig"
        );
        debug!(?self, "PortalConfig loaded (full debug)");
    }
}
