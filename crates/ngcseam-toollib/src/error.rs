//! Error types for tool table conversion.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a conversion.
#[derive(Error, Debug)]
pub enum ToolTableError {
    /// A pocket map item without a `:` separator.
    #[error("Invalid pocket map item: '{0}'. Expected 'Txx:yy'.")]
    InvalidPocketMapItem(String),

    /// A pocket map key that does not start with `T`.
    #[error("Invalid key '{0}'; must start with 'T'.")]
    InvalidPocketKey(String),

    /// A pocket map item whose tool or pocket is not a number.
    #[error("Invalid mapping '{0}'.")]
    InvalidPocketMapping(String),

    /// Constant Z lengths need a value.
    #[error("--z-source value requires --z-value")]
    MissingZValue,

    /// Reading the library or writing the table failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The library is not valid JSON or has an unexpected shape.
    #[error("Invalid tool library {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for tool table operations.
pub type ToolTableResult<T> = Result<T, ToolTableError>;
