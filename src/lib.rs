//! userdir - user directory maintenance with an audited change history
//!
//! Users are created, edited and deleted through a service layer that
//! writes one change record per create or update. Each record carries the
//! user's state before and after the change.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (users, typed ids, the entity contract)
//! - `storage`: JSON table and append-only journal backends
//! - `audit`: Snapshots, before/after payloads and change records
//! - `services`: Business logic layer
//! - `cli`, `display`: Command handlers and terminal formatting
//! - `logging`: Diagnostic output setup
//!
//! # Example
//!
//! ```rust,ignore
//! use userdir::config::paths::UserDirPaths;
//! use userdir::services::UserService;
//! use userdir::storage::Storage;
//!
//! let mut storage = Storage::new(UserDirPaths::new()?)?;
//! storage.load_all()?;
//!
//! let service = UserService::new(&storage);
//! let mut peter = service.find("ploew@example.com")?.unwrap();
//! peter.surname = "Loew-Smith".into();
//! service.update(peter)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::UserDirError;
