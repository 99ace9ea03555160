//! Error types for the furi library.

use thiserror::Error;

/// Errors that can occur during file operations.
#[derive(Error, Debug)]
pub enum FileError {
    /// An I/O error raised by the platform while opening, reading or writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested access mode is not one of the accepted mode strings.
    #[error("Cannot open file in {0:?}-mode")]
    InvalidMode(String),

    /// A read-oriented mode was used against a path that does not exist.
    #[error("{0} does not exist")]
    NotFound(String),

    /// The operation has no backend implementation.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    /// A filename pattern could not be compiled.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The URI could not be converted into an absolute URL.
    #[error("Invalid URI: {0}")]
    InvalidUri(#[from] url::ParseError),
}

/// Convenience type alias for Results using FileError.
pub type Result<T> = std::result::Result<T, FileError>;
