//! Error types for quakemap.
//!
//! Uses `thiserror` for library-style error definitions.

use thiserror::Error;

/// Errors that can occur in quakemap operations.
#[derive(Error, Debug)]
pub enum QuakemapError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// CSV parsing failed
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Catalog returned an error status
    #[error("catalog API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body lacks a required column header
    #[error("missing required column '{0}' in catalog response")]
    MissingColumn(&'static str),

    /// Invalid response structure
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
