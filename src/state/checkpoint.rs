//! Resume checkpoint
//!
//! A single JSON file recording the country and university the crawl last
//! started. Saves replace the file atomically; loads that fail for any reason
//! mean "no checkpoint".

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Crawl position at the time of the last save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Local time of the save, `YYYY-mm-dd HH:MM:SS`
    pub timestamp: String,

    /// Country being processed
    pub country: String,

    /// Index of the university within its country
    pub university_index: usize,

    /// Name of the university
    pub university: String,
}

impl Checkpoint {
    /// Parsed save time, if the timestamp is well formed
    pub fn saved_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT).ok()
    }
}

/// File-backed checkpoint store
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records that processing of `university` is starting
    ///
    /// # Arguments
    ///
    /// * `country` - Country being processed
    /// * `university_index` - Index of the university within the country
    /// * `university` - University name
    pub fn save(&self, country: &str, university_index: usize, university: &str) -> std::io::Result<()> {
        let checkpoint = Checkpoint {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            country: country.to_string(),
            university_index,
            university: university.to_string(),
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&checkpoint)?;
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(&temp_path, &self.path)
    }

    /// Loads the last checkpoint; any failure reads as `None`
    pub fn load(&self) -> Option<Checkpoint> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Could not read checkpoint {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(checkpoint) => Some(checkpoint),
            Err(e) => {
                tracing::warn!("Ignoring malformed checkpoint {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Deletes the checkpoint after a completed crawl
    pub fn clear(&self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
