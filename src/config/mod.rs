//! Configuration file loading and parsing.
//!
//! This module handles loading the optional configuration file from disk
//! and merging it with CLI flags into the [`CheckerConfig`] the binary
//! actually runs with (SPEC_FULL.md §12).
//!
//! # Configuration File Locations
//!
//! The configuration file is searched in the following order:
//!
//! 1. Path specified via `--config` CLI flag
//! 2. Default location:
//!    - **Linux/macOS:** `~/.pcb-drc/config.json`
//!    - **Windows:** `%USERPROFILE%\.pcb-drc\config.json`
//!
//! Any flag passed on the command line overrides the corresponding field
//! loaded from the file.

mod settings;

pub use settings::{Config, LoggingConfig};

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Fully resolved configuration the checker binary runs with: a loaded
/// [`Config`] file (if any) merged with CLI overrides.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub quick: bool,
    pub log_level: String,
}

impl CheckerConfig {
    /// Merges a loaded file config with CLI overrides. `input` from the CLI
    /// always wins; `file` supplies defaults for everything else.
    ///
    /// # Errors
    ///
    /// Returns an error if no input path was given on the CLI or in the file.
    pub fn merge(
        file: Option<Config>,
        cli_input: Option<PathBuf>,
        cli_output: Option<PathBuf>,
        cli_quick: bool,
    ) -> Result<Self, ConfigError> {
        let file = file.unwrap_or_default();
        let input = cli_input.or(file.input).ok_or_else(|| ConfigError::ValidationError {
            message: "no input board snapshot given (CLI argument or config file)".to_string(),
        })?;
        Ok(Self {
            input,
            output: cli_output.or(file.output),
            quick: cli_quick || file.quick,
            log_level: file.logging.level,
        })
    }
}

/// Returns the default configuration directory.
///
/// - **Linux/macOS:** `~/.pcb-drc/`
/// - **Windows:** `%USERPROFILE%\.pcb-drc\`
#[must_use]
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".pcb-drc"))
}

/// Returns the platform-specific default configuration file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|p| p.join("config.json"))
}

/// Loads and parses the configuration file, if one exists.
///
/// Unlike the binary's config path in plain CLI tools, a missing config file
/// here is not fatal: the checker can run purely off CLI flags. A config
/// file that exists but fails to parse or validate IS fatal.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, is malformed
/// JSON, or fails validation.
pub fn load_config(path: Option<&Path>) -> Result<Option<Config>, ConfigError> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => return Ok(None),
        },
    };

    if !config_path.exists() {
        if path.is_some() {
            return Err(ConfigError::NotFound { path: config_path });
        }
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;

    let config: Config = serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: config_path.clone(),
        source: e,
    })?;

    config.validate()?;

    Ok(Some(config))
}
