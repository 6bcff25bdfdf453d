use std::fmt;

pub mod audio;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod storage;
pub mod utils;

/// What kind of record a lookup miss refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Track,
    Playlist,
    Storage,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Track => write!(f, "track"),
            RecordKind::Playlist => write!(f, "playlist"),
            RecordKind::Storage => write!(f, "storage"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("Metadata parse error: {0}")]
    Parse(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid filename pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Settings error: {0}")]
    Settings(#[from] ::config::ConfigError),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl CatalogError {
    pub fn not_found(kind: RecordKind, id: impl Into<String>) -> Self {
        CatalogError::NotFound { kind, id: id.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

impl From<walkdir::Error> for CatalogError {
    fn from(err: walkdir::Error) -> Self {
        let message = err.to_string();
        match err.into_io_error() {
            Some(io) => CatalogError::Io(io),
            None => CatalogError::Io(std::io::Error::new(std::io::ErrorKind::Other, message)),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

// Re-exports for convenience
pub use audio::metadata::{MimeType, SymphoniaTagReader, TagReader, Tags};
pub use catalog::Catalog;
pub use storage::disk::DiskStorage;
pub use storage::id::IdDeriver;
pub use storage::model::{Playlist, Track};
pub use storage::StorageService;
pub use utils::range_reader::RangeReader;
