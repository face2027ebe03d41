//! Error types for the DRC core and its ambient CLI configuration layer.

use std::path::PathBuf;

use thiserror::Error;

/// Errors internal to the DRC core: broken invariants or malformed geometry
/// discovered while running a check.
///
/// These are never propagated to a DRC caller directly. The scheduler catches
/// them at the job boundary and turns them into a string pushed onto
/// [`crate::scheduler::RunResult::errors`], so one failing check never aborts
/// the rest of a run.
#[derive(Error, Debug, Clone)]
pub enum DrcError {
    /// An internal invariant was broken (e.g. hole-splicing found no valid
    /// seam, or a polygon-tree walk encountered a hole where a contour was
    /// expected).
    #[error("logic error: {message}")]
    Logic {
        /// Description of the broken invariant.
        message: String,
    },

    /// Geometry produced during a check was malformed in a way only
    /// detectable at evaluation time (e.g. a boolean operation produced an
    /// unexpected shape).
    #[error("runtime error: {message}")]
    Runtime {
        /// Description of the malformed geometry.
        message: String,
    },
}

impl DrcError {
    /// Creates a [`DrcError::Logic`].
    pub fn logic(message: impl Into<String>) -> Self {
        Self::Logic {
            message: message.into(),
        }
    }

    /// Creates a [`DrcError::Runtime`].
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            message: message.into(),
        }
    }
}

/// Result alias used throughout the polygon kernel and the rule checks.
pub type DrcResult<T> = Result<T, DrcError>;

/// Errors from the stand-alone checker binary's own configuration layer.
///
/// Kept separate from [`DrcError`]: these abort the process before a `Data`
/// snapshot exists, while `DrcError`s are contained per-job once a run has
/// started.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}
