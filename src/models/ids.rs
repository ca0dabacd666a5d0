//! Strongly-typed ID wrappers for all entity types
//!
//! Identities are store-assigned 64-bit integers. Using newtype wrappers
//! prevents accidentally mixing up IDs from different entity types at
//! compile time. The value `0` means "not yet assigned".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// The identity of an entity the store has not assigned yet
            pub const UNSET: Self = Self(0);

            /// Wrap a raw identity
            pub fn new(value: u64) -> Self {
                Self(value)
            }

            /// Get the raw identity
            pub fn value(&self) -> u64 {
                self.0
            }

            /// Whether the store still has to assign this identity
            pub fn is_unset(&self) -> bool {
                self.0 == 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_id!(UserId, "usr-");
define_id!(ChangeRecordId, "log-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_id() {
        assert!(UserId::UNSET.is_unset());
        assert!(UserId::default().is_unset());
        assert!(!UserId::new(1).is_unset());
    }

    #[test]
    fn test_id_display() {
        assert_eq!(UserId::new(7).to_string(), "usr-7");
        assert_eq!(ChangeRecordId::new(12).to_string(), "log-12");
    }

    #[test]
    fn test_id_parse_with_and_without_prefix() {
        assert_eq!("42".parse::<UserId>().unwrap(), UserId::new(42));
        assert_eq!("usr-42".parse::<UserId>().unwrap(), UserId::new(42));
        assert_eq!("log-3".parse::<ChangeRecordId>().unwrap(), ChangeRecordId::new(3));
        assert!("Peter".parse::<UserId>().is_err());
    }

    #[test]
    fn test_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&UserId::new(5)).unwrap();
        assert_eq!(json, "5");
        let id: UserId = serde_json::from_str("5").unwrap();
        assert_eq!(id.value(), 5);
    }
}
