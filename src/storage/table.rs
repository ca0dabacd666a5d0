//! Typed JSON tables
//!
//! One file per entity kind, holding the rows in insertion order plus the
//! identity counter. The whole table lives in memory behind a lock; every
//! mutation is staged on a copy, written atomically, and only then made
//! visible, so a failed write leaves both disk and memory untouched.

use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{UserDirError, UserDirResult};
use crate::models::Entity;

use super::file_io::{read_json, write_json_atomic};
use super::store::{require_key, EntityStore};

fn first_id() -> u64 {
    1
}

/// On-disk table layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct TableData<T> {
    /// Next identity to hand out; never decreases, so ids are never reused
    #[serde(default = "first_id")]
    next_id: u64,
    #[serde(default)]
    rows: Vec<T>,
}

impl<T> Default for TableData<T> {
    fn default() -> Self {
        Self {
            next_id: first_id(),
            rows: Vec::new(),
        }
    }
}

/// File-backed store for one entity kind
pub struct Table<T: Entity> {
    path: PathBuf,
    data: RwLock<TableData<T>>,
}

impl<T: Entity> Table<T> {
    /// Create a table backed by `path`. Nothing is read until [`Table::load`].
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(TableData::default()),
        }
    }

    /// Load the table from disk
    pub fn load(&self) -> UserDirResult<()> {
        let mut file_data: TableData<T> = read_json(&self.path)?;

        // Hand-edited files may carry rows past the counter
        let max_key = file_data.rows.iter().map(|row| row.key()).max().unwrap_or(0);
        file_data.next_id = file_data.next_id.max(max_key.saturating_add(1));

        let mut data = self.write_lock()?;
        *data = file_data;

        debug!(kind = %T::KIND, rows = data.rows.len(), path = %self.path.display(), "table loaded");
        Ok(())
    }

    /// Number of stored rows
    pub fn count(&self) -> UserDirResult<usize> {
        Ok(self.read_lock()?.rows.len())
    }

    /// Path of the backing file
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read_lock(&self) -> UserDirResult<RwLockReadGuard<'_, TableData<T>>> {
        self.data
            .read()
            .map_err(|e| UserDirError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_lock(&self) -> UserDirResult<RwLockWriteGuard<'_, TableData<T>>> {
        self.data
            .write()
            .map_err(|e| UserDirError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    fn commit(
        &self,
        data: &mut RwLockWriteGuard<'_, TableData<T>>,
        staged: TableData<T>,
    ) -> UserDirResult<()> {
        write_json_atomic(&self.path, &staged)?;
        **data = staged;
        Ok(())
    }

    fn exhausted(key: u64) -> UserDirError {
        UserDirError::Storage(format!("{} id {} leaves no id to assign next", T::KIND, key))
    }

    fn not_found(key: u64) -> UserDirError {
        UserDirError::NotFound {
            entity_type: T::KIND.name(),
            identifier: key.to_string(),
        }
    }
}

impl<T: Entity> EntityStore<T> for Table<T> {
    fn get_all(&self) -> UserDirResult<Vec<T>> {
        Ok(self.read_lock()?.rows.clone())
    }

    fn create(&self, mut entity: T) -> UserDirResult<T> {
        let mut data = self.write_lock()?;
        let mut staged = data.clone();

        match entity.key() {
            0 => entity.assign_key(staged.next_id),
            key if staged.rows.iter().any(|row| row.key() == key) => {
                return Err(UserDirError::Duplicate {
                    entity_type: T::KIND.name(),
                    identifier: key.to_string(),
                });
            }
            _ => {}
        }

        let after = entity
            .key()
            .checked_add(1)
            .ok_or_else(|| Self::exhausted(entity.key()))?;
        staged.next_id = staged.next_id.max(after);
        staged.rows.push(entity.clone());
        self.commit(&mut data, staged)?;

        debug!(kind = %T::KIND, id = entity.key(), "row created");
        Ok(entity)
    }

    fn update(&self, entity: T) -> UserDirResult<T> {
        let key = require_key(&entity, "update")?;

        let mut data = self.write_lock()?;
        let position = data
            .rows
            .iter()
            .position(|row| row.key() == key)
            .ok_or_else(|| Self::not_found(key))?;

        let mut staged = data.clone();
        staged.rows[position] = entity.clone();
        self.commit(&mut data, staged)?;

        debug!(kind = %T::KIND, id = key, "row updated");
        Ok(entity)
    }

    fn delete(&self, entity: &T) -> UserDirResult<()> {
        let key = require_key(entity, "delete")?;

        let mut data = self.write_lock()?;
        let position = data
            .rows
            .iter()
            .position(|row| row.key() == key)
            .ok_or_else(|| Self::not_found(key))?;

        let mut staged = data.clone();
        staged.rows.remove(position);
        self.commit(&mut data, staged)?;

        debug!(kind = %T::KIND, id = key, "row deleted");
        Ok(())
    }
}
