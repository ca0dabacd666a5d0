//! Point-in-time copies of an entity's fields
//!
//! A snapshot is the entity serialized into an ordered field map. It owns
//! its values outright, so later edits to the entity never show through.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{UserDirError, UserDirResult};

/// Immutable field-name to value map, in field-declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(Map<String, Value>);

impl Snapshot {
    /// Capture every serialized field of `entity`
    ///
    /// Fails with `MalformedPayload` when the entity does not serialize to a
    /// field map (a bare string or number, for instance).
    pub fn capture<T: Serialize>(entity: &T) -> UserDirResult<Self> {
        match serde_json::to_value(entity)? {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(UserDirError::MalformedPayload(format!(
                "expected a field map, got {}",
                value_kind(&other)
            ))),
        }
    }

    pub(crate) fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Value of one field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Whether the snapshot has a field with this name
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The underlying map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{User, UserId};
    use serde_json::json;

    fn peter() -> User {
        let mut user = User::new("Peter", "Loew", "ploew@example.com");
        user.id = UserId::new(1);
        user
    }

    #[test]
    fn test_capture_all_fields_in_order() {
        let snapshot = Snapshot::capture(&peter()).unwrap();

        let names: Vec<&str> = snapshot.fields().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            names,
            vec!["Id", "Forename", "Surname", "Email", "IsActive", "DateOfBirth"]
        );
        assert_eq!(snapshot.get("Id"), Some(&json!(1)));
        assert_eq!(snapshot.get("DateOfBirth"), Some(&Value::Null));
    }

    #[test]
    fn test_capture_is_independent_of_later_edits() {
        let mut user = peter();
        let snapshot = Snapshot::capture(&user).unwrap();

        user.surname = "Loew-Smith".to_string();
        user.is_active = false;

        assert_eq!(snapshot.get("Surname"), Some(&json!("Loew")));
        assert_eq!(snapshot.get("IsActive"), Some(&json!(true)));
    }

    #[test]
    fn test_snapshots_compare_by_field_values() {
        let a = Snapshot::capture(&peter()).unwrap();
        let b = Snapshot::capture(&peter()).unwrap();
        assert_eq!(a, b);

        let mut changed = peter();
        changed.email = "peter@example.com".to_string();
        assert_ne!(a, Snapshot::capture(&changed).unwrap());
    }

    #[test]
    fn test_capture_rejects_non_map_values() {
        let err = Snapshot::capture(&"just a string").unwrap_err();
        assert!(matches!(err, UserDirError::MalformedPayload(_)));
    }
}
