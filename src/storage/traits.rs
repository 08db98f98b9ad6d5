//! Storage traits and error types
//!
//! This module defines the sink interface the crawl persists its tables
//! through, and the associated error types.

use crate::records::Tables;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Snapshot not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Could not persist tables to {} nor to backup {}: {message}", primary.display(), backup.display())]
    Unpersisted {
        primary: PathBuf,
        backup: PathBuf,
        message: String,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Destination for snapshots of the accumulated tables
///
/// A snapshot always holds every sheet, so writing one replaces whatever an
/// earlier snapshot left at the same path.
pub trait TableSink: Send + Sync {
    /// Writes all tables to `path`
    ///
    /// # Arguments
    ///
    /// * `tables` - The accumulated records
    /// * `path` - Destination of the snapshot
    fn write(&self, tables: &Tables, path: &Path) -> StorageResult<()>;

    /// Row counts per sheet of a snapshot previously written to `path`
    fn counts(&self, path: &Path) -> StorageResult<Vec<(String, usize)>>;
}
