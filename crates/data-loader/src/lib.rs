//! # Data Loader Crate
//!
//! Ingestion and normalization of the two movie catalogs.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (MovieRecord, ContentCatalog, RatingsCatalog)
//! - **parser**: Parse the raw CSV tables and their serialized nested columns
//! - **index**: Join, normalize, and build the in-memory catalogs
//! - **error**: Error types for catalog loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{ContentCatalog, RatingsCatalog};
//! use std::path::Path;
//!
//! // Fatal if unreadable: nothing can be served without it.
//! let catalog = ContentCatalog::load_from_files(Path::new("data"))?;
//!
//! // Recoverable: the engine degrades collaborative queries instead.
//! let ratings = RatingsCatalog::load_from_files(Path::new("dataforcollab"));
//!
//! let movie = catalog.get_by_id(19995).unwrap();
//! println!("{} [{}]", movie.title, movie.genres.join(", "));
//! ```

// Public modules
pub mod error;
pub mod index;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use types::{
    // Type aliases
    MlMovieId,
    MovieId,
    UserId,
    // Core types
    ContentCatalog,
    LoadDiagnostics,
    MovieRecord,
    RatingEntry,
    RatingsCatalog,
};
