//! Consulted-references log
//!
//! An append-only Markdown file with one line per consulted URL:
//! `- [<Entity> – <Purpose>] <URL>`. Each line is written with a single
//! `write_all` while holding the file lock, so concurrent extractors never
//! interleave partial lines.

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Append-only log of consulted URLs
#[derive(Debug)]
pub struct ReferenceLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl ReferenceLog {
    /// Creates (or truncates) the log and writes its header
    pub fn create(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = File::create(&path)?;
        let header = format!(
            "# Consulted references - {}\n\n",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        file.write_all(header.as_bytes())?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Opens an existing log for appending, creating it with a header if missing
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Self::create(path);
        }

        let file = OpenOptions::new().append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records that `url` was consulted for `entity` with the given purpose
    ///
    /// Failures are logged, never returned: a missing reference line must not
    /// cost an extraction.
    pub fn record(&self, entity: &str, purpose: &str, url: &str) {
        let line = format_line(entity, purpose, url);
        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = file.write_all(line.as_bytes()) {
            tracing::warn!("Failed to record reference {}: {}", url, e);
        }
    }
}

fn format_line(entity: &str, purpose: &str, url: &str) -> String {
    let entity = entity.replace(['\n', '\r'], " ");
    let purpose = purpose.replace(['\n', '\r'], " ");
    format!("- [{} \u{2013} {}] {}\n", entity.trim(), purpose.trim(), url.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_line_format() {
        assert_eq!(
            format_line("Example University", "Admissions", "https://example.edu/apply"),
            "- [Example University \u{2013} Admissions] https://example.edu/apply\n"
        );
    }

    #[test]
    fn test_newlines_are_flattened() {
        let line = format_line("Lab\nName", "Lab page", "https://example.edu/lab");
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[test]
    fn test_create_writes_header_then_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("refs.md");
        let log = ReferenceLog::create(&path).unwrap();

        log.record("Uni", "Home page", "https://uni.example/");
        log.record("Uni", "Admissions", "https://uni.example/admissions");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert!(lines[0].starts_with("# Consulted references"));
        assert_eq!(lines[2], "- [Uni \u{2013} Home page] https://uni.example/");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_open_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("refs.md");
        ReferenceLog::create(&path).unwrap().record("A", "p", "https://a.example/");
        ReferenceLog::open(&path).unwrap().record("B", "p", "https://b.example/");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[A \u{2013} p]"));
        assert!(content.contains("[B \u{2013} p]"));
    }

    #[test]
    fn test_concurrent_appends_never_interleave() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("refs.md");
        let log = Arc::new(ReferenceLog::create(&path).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let log = Arc::clone(&log);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        log.record(
                            &format!("Worker {}", worker),
                            "Concurrent",
                            &format!("https://example.edu/{}/{}", worker, i),
                        );
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let entries: Vec<&str> = content.lines().filter(|l| l.starts_with("- ")).collect();
        assert_eq!(entries.len(), 400);
        for line in entries {
            assert!(line.starts_with("- [Worker "));
            assert!(line.contains(" \u{2013} Concurrent] https://example.edu/"));
        }
    }
}
