//! Error types for presentation import.
//!
//! These errors never cross the import boundary: the importers absorb them
//! into placeholder slides. They exist so internal steps can use `?`.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while importing a presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read bytes from an archive entry or stream.
    #[error("Failed to read data: {0}")]
    IoError(#[from] std::io::Error),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for PPTX).
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// OLE/CFB container error (for PPT).
    #[error("OLE/CFB error: {0}")]
    CfbError(String),

    /// A part the caller asked for is not in the package.
    #[error("Missing part: {0}")]
    MissingPart(String),

    /// A part exists but its content is unusable.
    #[error("Malformed part '{part}': {reason}")]
    MalformedPart { part: String, reason: String },
}
