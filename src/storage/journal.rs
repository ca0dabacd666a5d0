//! Append-only JSON-lines store
//!
//! Each line is one complete JSON object. Records are appended and flushed
//! one at a time and are never rewritten, so the journal rejects updates and
//! deletes outright.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::{UserDirError, UserDirResult};
use crate::models::Entity;

use super::store::EntityStore;

/// Append-only store for one entity kind
pub struct Journal<T: Entity> {
    log_path: PathBuf,
    /// Next identity, discovered from the file on first append
    next_id: Mutex<Option<u64>>,
    _kind: PhantomData<fn() -> T>,
}

impl<T: Entity> Journal<T> {
    /// Create a journal that appends to `log_path`
    pub fn new(log_path: PathBuf) -> Self {
        Self {
            log_path,
            next_id: Mutex::new(None),
            _kind: PhantomData,
        }
    }

    /// Read every record, oldest first
    pub fn read_all(&self) -> UserDirResult<Vec<T>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| UserDirError::Io(format!("Failed to open {}: {}", self.log_path.display(), e)))?;

        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                UserDirError::Io(format!("Failed to read journal line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let record: T = serde_json::from_str(&line).map_err(|e| {
                UserDirError::Storage(format!(
                    "Failed to parse {} at line {}: {}",
                    T::KIND,
                    line_num + 1,
                    e
                ))
            })?;

            records.push(record);
        }

        Ok(records)
    }

    /// Read the most recent `count` records, oldest first
    pub fn read_recent(&self, count: usize) -> UserDirResult<Vec<T>> {
        let mut all = self.read_all()?;
        let start = all.len().saturating_sub(count);
        Ok(all.split_off(start))
    }

    /// Number of records in the journal
    pub fn entry_count(&self) -> UserDirResult<usize> {
        Ok(self.read_all()?.len())
    }

    /// Check if the journal file exists
    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }

    /// Get the path to the journal file
    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }

    fn append(&self, record: &T) -> UserDirResult<()> {
        let json = serde_json::to_string(record)
            .map_err(|e| UserDirError::Json(format!("Failed to serialize {}: {}", T::KIND, e)))?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| UserDirError::Io(format!("Failed to open journal: {}", e)))?;

        append_or_truncate(&file, |mut out| {
            writeln!(out, "{}", json)?;
            out.flush()
        })
        .map_err(|e| UserDirError::Io(format!("Failed to write journal: {}", e)))?;

        file.sync_data()
            .map_err(|e| UserDirError::Io(format!("Failed to sync journal: {}", e)))?;

        Ok(())
    }

    fn append_only(operation: &str) -> UserDirError {
        UserDirError::Storage(format!(
            "Cannot {} {}: the journal is append-only",
            operation,
            T::KIND
        ))
    }
}

/// Run `write` against the end of `file`; on failure cut the file back to
/// its previous length so no partial line is left behind
fn append_or_truncate<F>(file: &File, write: F) -> std::io::Result<()>
where
    F: FnOnce(&File) -> std::io::Result<()>,
{
    let start = file.metadata()?.len();

    if let Err(e) = write(file) {
        if let Err(truncate_error) = file.set_len(start) {
            warn!(error = %truncate_error, "could not remove partial journal line");
        }
        return Err(e);
    }

    Ok(())
}

impl<T: Entity> EntityStore<T> for Journal<T> {
    fn get_all(&self) -> UserDirResult<Vec<T>> {
        self.read_all()
    }

    fn create(&self, mut record: T) -> UserDirResult<T> {
        let mut next_id = self
            .next_id
            .lock()
            .map_err(|e| UserDirError::Storage(format!("Failed to acquire journal lock: {}", e)))?;

        let next = match *next_id {
            Some(next) => next,
            None => self
                .read_all()?
                .iter()
                .map(|row| row.key())
                .max()
                .unwrap_or(0)
                .saturating_add(1),
        };

        match record.key() {
            0 => record.assign_key(next),
            key if key < next => {
                return Err(UserDirError::Duplicate {
                    entity_type: T::KIND.name(),
                    identifier: key.to_string(),
                });
            }
            _ => {}
        }

        let after = record.key().checked_add(1).ok_or_else(|| {
            UserDirError::Storage(format!(
                "{} id {} leaves no id to assign next",
                T::KIND,
                record.key()
            ))
        })?;

        self.append(&record)?;
        *next_id = Some(after);

        debug!(kind = %T::KIND, id = record.key(), "record appended");
        Ok(record)
    }

    fn update(&self, _record: T) -> UserDirResult<T> {
        Err(Self::append_only("update"))
    }

    fn delete(&self, _record: &T) -> UserDirResult<()> {
        Err(Self::append_only("delete"))
    }
}
