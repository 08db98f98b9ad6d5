//! SQLite snapshot implementation
//!
//! This module provides a SQLite-based implementation of the TableSink trait.
//! Each snapshot is a fresh database file holding one table per sheet.

use crate::records::{Record, Tables};
use crate::storage::schema::{initialize_schema, insert_sql, quote_ident, sheets};
use crate::storage::traits::{StorageError, StorageResult, TableSink};
use rusqlite::{params_from_iter, Connection, OpenFlags, Transaction};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes table snapshots as SQLite databases
#[derive(Debug, Clone, Default)]
pub struct SqliteSnapshot;

impl SqliteSnapshot {
    pub fn new() -> Self {
        Self
    }
}

/// Sibling path the snapshot is built at before being moved into place
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn insert_rows<R: Record>(tx: &Transaction<'_>, rows: &[R]) -> StorageResult<()> {
    let mut stmt = tx.prepare(&insert_sql(R::SHEET, R::COLUMNS))?;
    for row in rows {
        stmt.execute(params_from_iter(row.cells()))?;
    }
    Ok(())
}

fn write_database(tables: &Tables, path: &Path) -> StorageResult<()> {
    let mut conn = Connection::open(path)?;
    initialize_schema(&conn)?;

    let tx = conn.transaction()?;
    insert_rows(&tx, &tables.universities)?;
    insert_rows(&tx, &tables.programs)?;
    insert_rows(&tx, &tables.labs)?;
    insert_rows(&tx, &tables.scholarships)?;
    insert_rows(&tx, &tables.admissions)?;
    insert_rows(&tx, &tables.costs)?;
    insert_rows(&tx, &tables.outcomes)?;
    insert_rows(&tx, &tables.notes)?;
    insert_rows(&tx, &tables.timelines)?;
    tx.commit()?;

    conn.close().map_err(|(_, e)| StorageError::Sqlite(e))
}

impl TableSink for SqliteSnapshot {
    fn write(&self, tables: &Tables, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let staging = staging_path(path);
        if staging.exists() {
            fs::remove_file(&staging)?;
        }

        if let Err(e) = write_database(tables, &staging) {
            let _ = fs::remove_file(&staging);
            return Err(e);
        }
        fs::rename(&staging, path)?;

        tracing::debug!("Wrote table snapshot to {}", path.display());
        Ok(())
    }

    fn counts(&self, path: &Path) -> StorageResult<Vec<(String, usize)>> {
        if !path.exists() {
            return Err(StorageError::NotFound(path.to_path_buf()));
        }
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

        let mut counts = Vec::new();
        for (sheet, _) in sheets() {
            let count: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", quote_ident(sheet)),
                [],
                |row| row.get(0),
            )?;
            let count = usize::try_from(count)
                .map_err(|_| StorageError::Database(format!("negative row count in {}", sheet)))?;
            counts.push((sheet.to_string(), count));
        }
        Ok(counts)
    }
}
