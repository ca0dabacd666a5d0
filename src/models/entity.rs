//! The entity abstraction shared by every stored kind
//!
//! Each concrete kind names itself with an [`EntityKind`] token and exposes
//! its identity as a raw `u64`, so stores can be written once and
//! instantiated per kind without any runtime type inspection.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Token naming each stored collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    ChangeRecord,
}

impl EntityKind {
    /// Human-readable name, used in errors and log events
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::ChangeRecord => "Change record",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A stored business object with a stable numeric identity
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync {
    /// The collection this kind lives in
    const KIND: EntityKind;

    /// Raw identity; `0` while unassigned
    fn key(&self) -> u64;

    /// Set the identity. Only stores call this, at creation.
    fn assign_key(&mut self, key: u64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(EntityKind::User.to_string(), "User");
        assert_eq!(EntityKind::ChangeRecord.to_string(), "Change record");
    }
}
