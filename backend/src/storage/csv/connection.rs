//! # CSV Connection
//!
//! Owns the data directory and the lock every repository goes through.
//!
//! ```text
//! data/
//! └── {profile_id}/
//!     ├── children/{child_id}.yaml
//!     ├── recipes.csv
//!     ├── meal_plans.csv
//!     ├── leftovers.csv
//!     ├── pantry.csv
//!     ├── shopping_list.json
//!     └── photos/{file}
//! ```
//!
//! All writes go to a temporary file that is renamed into place, so a failed
//! write never leaves a half-written table behind.

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

use crate::domain::errors::DomainError;

const MAX_COMPONENT_LENGTH: usize = 64;

/// CsvConnection manages the data directory shared by all repositories
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
    lock: Arc<RwLock<()>>,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).with_context(|| {
                format!("Failed to create data directory {}", base_path.display())
            })?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
            lock: Arc::new(RwLock::new(())),
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Shared access for pure reads
    pub async fn read_lock(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read().await
    }

    /// Exclusive access for read-modify-write cycles
    pub async fn write_lock(&self) -> RwLockWriteGuard<'_, ()> {
        self.lock.write().await
    }

    /// Directory holding a profile's data (not created)
    pub fn profile_directory(&self, profile_id: &str) -> Result<PathBuf> {
        validate_path_component("Profile id", profile_id)?;
        Ok(self.base_directory.join(profile_id))
    }

    /// Path of a file inside a profile directory, creating the directory if needed
    pub fn ensure_profile_file(&self, profile_id: &str, file_name: &str) -> Result<PathBuf> {
        let dir = self.profile_directory(profile_id)?;
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            info!("Created profile directory: {}", dir.display());
        }
        Ok(dir.join(file_name))
    }

    /// Read every row of a CSV table. A missing file is an empty table and
    /// rows that fail to parse are skipped with a warning.
    pub fn read_csv<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(BufReader::new(file));

        let mut rows = Vec::new();
        for (index, result) in reader.deserialize::<T>().enumerate() {
            match result {
                Ok(row) => rows.push(row),
                Err(e) => {
                    warn!(
                        "Skipping malformed row {} in {}: {}",
                        index + 1,
                        path.display(),
                        e
                    );
                }
            }
        }

        debug!("Read {} rows from {}", rows.len(), path.display());
        Ok(rows)
    }

    /// Replace a CSV table with the given header and rows
    pub fn write_csv<T: Serialize>(&self, path: &Path, header: &[&str], rows: &[T]) -> Result<()> {
        let temp_path = path.with_extension("csv.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            let mut writer = WriterBuilder::new()
                .has_headers(false)
                .from_writer(BufWriter::new(file));

            writer.write_record(header)?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }

        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        debug!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(())
    }

    /// Replace a file's content
    pub fn write_atomic(&self, path: &Path, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = path.with_extension("tmp");
        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content)?;
            writer.flush()?;
        }
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }
}

/// Ids end up in file paths: `[A-Za-z0-9_-]`, 1 to 64 characters
pub fn validate_path_component(field: &str, value: &str) -> Result<(), DomainError> {
    let valid_chars = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if value.is_empty() || value.len() > MAX_COMPONENT_LENGTH || !valid_chars {
        return Err(DomainError::validation(format!(
            "{} must be 1-{} characters of letters, digits, '_' or '-': {:?}",
            field, MAX_COMPONENT_LENGTH, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: String,
        quantity: f64,
        note: Option<String>,
    }

    #[test]
    fn test_validate_path_component() {
        assert!(validate_path_component("Id", "family-1_a").is_ok());
        assert!(validate_path_component("Id", "").is_err());
        assert!(validate_path_component("Id", "../etc").is_err());
        assert!(validate_path_component("Id", "a/b").is_err());
        assert!(validate_path_component("Id", &"a".repeat(65)).is_err());
    }

    #[test]
    fn test_csv_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        let path = connection.ensure_profile_file("family", "rows.csv").unwrap();

        let rows = vec![
            Row { id: "a".into(), quantity: 1.5, note: None },
            Row { id: "b".into(), quantity: 2.0, note: Some("with, comma".into()) },
        ];
        connection.write_csv(&path, &["id", "quantity", "note"], &rows).unwrap();

        let read: Vec<Row> = connection.read_csv(&path).unwrap();
        assert_eq!(read, rows);
        assert!(!path.with_extension("csv.tmp").exists());
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        let path = connection.ensure_profile_file("family", "rows.csv").unwrap();

        connection.write_csv::<Row>(&path, &["id", "quantity", "note"], &[]).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), "id,quantity,note");
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        let path = connection.ensure_profile_file("family", "rows.csv").unwrap();
        fs::write(&path, "id,quantity,note\na,1.0,\nb,lots,\nc,3.0,x\n").unwrap();

        let read: Vec<Row> = connection.read_csv(&path).unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[0].id, "a");
        assert_eq!(read[1].id, "c");
    }

    #[test]
    fn test_missing_table_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        let path = connection.profile_directory("family").unwrap().join("rows.csv");

        let read: Vec<Row> = connection.read_csv(&path).unwrap();
        assert!(read.is_empty());
    }
}
