//! Error types for the merge core.
//!
//! Structural oddities in the input programs and validation findings are
//! not errors; they degrade gracefully or end up in
//! [`MergeStats`](crate::MergeStats). What remains here aborts a run.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a merge run.
#[derive(Error, Debug)]
pub enum MergeError {
    /// An input could not be read or the output could not be written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The merged program could not be moved into place.
    #[error("Failed to write output {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The run summary could not be written.
    #[error("Failed to write summary: {0}")]
    Report(#[source] io::Error),

    /// Nothing to merge.
    #[error("No input programs given")]
    NoInputs,

    /// Directory mode found no `.ngc` file with a trailing number.
    #[error("No numbered .ngc files found in directory {}", dir.display())]
    NoNumberedFiles { dir: PathBuf },

    /// Directory mode was requested for something that is not a directory.
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The merge configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl MergeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors related to merge configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The renumbering step must advance.
    #[error("Renumber step must be > 0")]
    ZeroRenumberStep,

    /// The toolchange subroutine name is unusable.
    #[error("Invalid toolchange subroutine name '{0}'")]
    InvalidSubroutine(String),

    /// The numbering range runs past `u64::MAX` within a realistic program.
    #[error("Renumber start {start} with step {step} overflows the sequence range")]
    RenumberRangeOverflow { start: u64, step: u64 },

    /// The configuration file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON deserialization error.
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Only `.json` and `.toml` are understood.
    #[error("Config file must be .json or .toml: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Result type alias for merge operations.
pub type MergeResult<T> = Result<T, MergeError>;
