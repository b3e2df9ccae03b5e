//! University data sources and list queries for the study-abroad map

pub mod query;
pub mod sources;

use thiserror::Error;

// Re-exports
pub use query::{ListQuery, SortOrder, LANGUAGES};
pub use sources::{JsonFileSource, MemorySource};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}
