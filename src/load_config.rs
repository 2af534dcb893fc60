/// `load_config` module: builds a [`PortalConfig`] from defaults, an optional
/// YAML file and the environment.
///
/// # Responsibilities
/// - Parse the user-supplied YAML file into the typed config (unknown keys rejected)
/// - Apply the `MD_PORTAL_OUTPUT_DIR` environment override
/// - Produce clear diagnostics; every failure here surfaces at the CLI boundary
///
/// CLI flags are applied on top of the result by [`crate::cli::run`].
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::config::PortalConfig;

pub const OUTPUT_DIR_ENV: &str = "MD_PORTAL_OUTPUT_DIR";

/// Loads the configuration. Without a path the built-in defaults are used.
pub fn load_config(path: Option<&Path>) -> Result<PortalConfig> {
    let mut config = match path {
        Some(path_ref) => read_config_file(path_ref)?,
        None => {
            info!("No config file given, using defaults");
            PortalConfig::default()
        }
    };

    match std::env::var(OUTPUT_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => {
            info!(output_dir = %dir, "{} found in env", OUTPUT_DIR_ENV);
            config.output_dir = PathBuf::from(dir);
        }
        Ok(_) => {
            error!("{} is set but empty", OUTPUT_DIR_ENV);
            anyhow::bail!("{OUTPUT_DIR_ENV} environment variable is set but empty");
        }
        Err(std::env::VarError::NotPresent) => {}
        Err(std::env::VarError::NotUnicode(raw)) => {
            error!(value = ?raw, "{} is not valid UTF-8", OUTPUT_DIR_ENV);
            anyhow::bail!("{OUTPUT_DIR_ENV} environment variable is not valid UTF-8: {raw:?}");
        }
    }

    config.trace_loaded();
    Ok(config)
}

fn read_config_file(path_ref: &Path) -> Result<PortalConfig> {
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    // An empty file is a valid "all defaults" config.
    if config_content.trim().is_empty() {
        return Ok(PortalConfig::default());
    }

    match serde_yaml::from_str::<PortalConfig>(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            Ok(conf)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}
