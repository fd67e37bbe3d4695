//! Error types for writing generated files.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while writing generated output.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// A directory could not be created.
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be written.
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Android output needs a package name the manifest does not carry.
    #[error("extension '{extension}' has no android package name")]
    MissingPackageName { extension: String },
}

/// Result type for codegen operations.
pub type CodegenResult<T> = Result<T, CodegenError>;
