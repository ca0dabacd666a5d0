//! Configuration module for userdir
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::UserDirPaths;
pub use settings::Settings;
