//! Storage module for persisting the accumulated tables
//!
//! This module handles all database output of a crawl:
//! - the `TableSink` interface snapshots are written through
//! - the SQLite snapshot implementation and its schema
//! - partial and backup snapshot naming
//! - the final write with its backup fallback

mod schema;
mod sqlite;
mod traits;

pub use schema::sheets;
pub use sqlite::SqliteSnapshot;
pub use traits::{StorageError, StorageResult, TableSink};

use crate::records::Tables;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Path of the partial snapshot taken after a university
///
/// Snapshots are named by the university's 1-based position in its country,
/// so a resumed run never reuses the names of the run it resumes.
///
/// # Arguments
///
/// * `directory` - Directory partial snapshots are kept in
/// * `country` - Country of the university just processed
/// * `position` - 1-based position of that university in the country
pub fn partial_path(directory: &Path, country: &str, position: usize) -> PathBuf {
    let country: String = country
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    directory.join(format!("partial_{}_{}.db", country, position))
}

/// Timestamped backup path beside the main database
pub fn backup_path(database_path: &Path, now: DateTime<Utc>) -> PathBuf {
    database_path.with_file_name(format!("backup_{}.db", now.format("%Y%m%d_%H%M%S")))
}

/// Writes the final snapshot, falling back to a backup file
///
/// # Returns
///
/// * `Ok(PathBuf)` - Where the tables ended up
/// * `Err(StorageError::Unpersisted)` - Neither location could be written
pub fn persist_with_backup(
    sink: &dyn TableSink,
    tables: &Tables,
    database_path: &Path,
) -> StorageResult<PathBuf> {
    let primary_error = match sink.write(tables, database_path) {
        Ok(()) => return Ok(database_path.to_path_buf()),
        Err(e) => e,
    };
    tracing::warn!(
        "Failed to write {}: {}; trying a backup file",
        database_path.display(),
        primary_error
    );

    let backup = backup_path(database_path, Utc::now());
    match sink.write(tables, &backup) {
        Ok(()) => Ok(backup),
        Err(backup_error) => Err(StorageError::Unpersisted {
            primary: database_path.to_path_buf(),
            backup,
            message: format!("{}; {}", primary_error, backup_error),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Mutex;

    #[test]
    fn test_partial_path() {
        let path = partial_path(Path::new("partial"), "Reino Unido", 10);
        assert_eq!(path, PathBuf::from("partial/partial_Reino_Unido_10.db"));

        let path = partial_path(Path::new("partial"), "España", 5);
        assert_eq!(path, PathBuf::from("partial/partial_España_5.db"));
    }

    #[test]
    fn test_backup_path() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 14, 5, 9).unwrap();
        let path = backup_path(Path::new("out/dossier.db"), now);
        assert_eq!(path, PathBuf::from("out/backup_20240301_140509.db"));
    }

    /// Sink that fails for the first `failures` writes
    struct FlakySink {
        failures: usize,
        written: Mutex<Vec<PathBuf>>,
    }

    impl TableSink for FlakySink {
        fn write(&self, _tables: &Tables, path: &Path) -> StorageResult<()> {
            let mut written = self.written.lock().unwrap();
            if written.len() < self.failures {
                written.push(PathBuf::new());
                return Err(StorageError::Database("disk full".to_string()));
            }
            written.push(path.to_path_buf());
            Ok(())
        }

        fn counts(&self, _path: &Path) -> StorageResult<Vec<(String, usize)>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_persist_primary() {
        let sink = FlakySink { failures: 0, written: Mutex::new(Vec::new()) };
        let path = persist_with_backup(&sink, &Tables::default(), Path::new("out/dossier.db")).unwrap();
        assert_eq!(path, PathBuf::from("out/dossier.db"));
    }

    #[test]
    fn test_persist_falls_back_to_backup() {
        let sink = FlakySink { failures: 1, written: Mutex::new(Vec::new()) };
        let path = persist_with_backup(&sink, &Tables::default(), Path::new("out/dossier.db")).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("backup_"), "{}", name);
        assert_eq!(path.parent(), Some(Path::new("out")));
    }

    #[test]
    fn test_persist_double_failure() {
        let sink = FlakySink { failures: 2, written: Mutex::new(Vec::new()) };
        let result = persist_with_backup(&sink, &Tables::default(), Path::new("out/dossier.db"));
        assert!(matches!(result, Err(StorageError::Unpersisted { .. })));
    }
}
