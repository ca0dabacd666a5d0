//! Storage layer for userdir
//!
//! Users live in a JSON table written atomically on every change; audit
//! records live in an append-only JSON-lines journal. Both implement
//! [`EntityStore`], the contract the services are written against.

pub mod file_io;
pub mod init;
pub mod journal;
pub mod store;
pub mod table;

pub use file_io::{read_json, write_json_atomic};
pub use init::{initialize_storage, seed_default_users};
pub use journal::Journal;
pub use store::EntityStore;
pub use table::Table;

use crate::audit::ChangeRecord;
use crate::config::paths::UserDirPaths;
use crate::error::UserDirError;
use crate::models::User;

/// Main storage coordinator that owns one store per entity kind
pub struct Storage {
    paths: UserDirPaths,
    pub users: Table<User>,
    pub audit: Journal<ChangeRecord>,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: UserDirPaths) -> Result<Self, UserDirError> {
        paths.ensure_directories()?;

        Ok(Self {
            users: Table::new(paths.users_file()),
            audit: Journal::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &UserDirPaths {
        &self.paths
    }

    /// Load all tables from disk. The journal is read on demand.
    pub fn load_all(&mut self) -> Result<(), UserDirError> {
        self.users.load()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
