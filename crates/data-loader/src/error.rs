//! Error types for the data-loader crate.

use thiserror::Error;

/// Errors that can occur while loading and normalizing a catalog.
///
/// Only the content-catalog load path surfaces these as fatal; the
/// ratings load path is caught by the engine and collapsed into the
/// degraded collaborative state.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// File could not be opened or read
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A CSV record could not be parsed into the expected row shape
    #[error("CSV error in {file}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// Catalog-level integrity check failed
    #[error("validation failed: {0}")]
    Validation(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
