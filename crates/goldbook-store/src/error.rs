//! Error types for goldbook-store

use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Syntax error in {location}: {message}")]
    SyntaxError {
        location: String,
        message: String,
    },

    #[error("Unsupported book format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Invalid include pattern: {pattern}")]
    InvalidPattern { pattern: String },

    #[error("Included file not found: {path}")]
    IncludeNotFound { path: String },

    #[error("Include cycle: {path} is already being loaded")]
    IncludeCycle { path: String },

    #[error("IO error")]
    IoError(#[from] io::Error),
}
