//! Before/after payloads for audit records
//!
//! A [`DiffPayload`] pairs the state before a mutation with the state after
//! it. Its persisted form is a JSON object with exactly two members:
//!
//! ```text
//! {"OldDetails": "N/A" | {<fields>}, "NewDetails": {<fields>}}
//! ```
//!
//! `"N/A"` only exists in that text. In memory the missing prior state is
//! [`Details::Absent`], so a field that happens to hold the text "N/A" can
//! never be mistaken for it.
//!
//! The read side ([`flatten`], [`flatten_sections`]) is for display only and
//! never fails: anything it cannot make sense of renders as an empty string.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{UserDirError, UserDirResult};

use super::snapshot::{value_kind, Snapshot};

/// Persisted marker for "no prior state"
pub const ABSENT_MARKER: &str = "N/A";

/// Member holding the state before the mutation
pub const OLD_DETAILS: &str = "OldDetails";

/// Member holding the state after the mutation
pub const NEW_DETAILS: &str = "NewDetails";

/// Prior state of a subject: nothing (creation) or a full snapshot (update)
#[derive(Debug, Clone, PartialEq)]
pub enum Details {
    Absent,
    Present(Snapshot),
}

impl Details {
    pub fn is_absent(&self) -> bool {
        matches!(self, Details::Absent)
    }

    /// The snapshot, when there is one
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            Details::Absent => None,
            Details::Present(snapshot) => Some(snapshot),
        }
    }
}

impl Serialize for Details {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Details::Absent => serializer.serialize_str(ABSENT_MARKER),
            Details::Present(snapshot) => snapshot.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Details {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(text) if text == ABSENT_MARKER => Ok(Details::Absent),
            Value::Object(fields) => Ok(Details::Present(Snapshot::from_map(fields))),
            other => Err(de::Error::custom(format!(
                "expected \"{}\" or a field map, got {}",
                ABSENT_MARKER,
                value_kind(&other)
            ))),
        }
    }
}

/// Structured before/after pair stored inside a change record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiffPayload {
    #[serde(rename = "OldDetails")]
    pub before: Details,

    #[serde(rename = "NewDetails")]
    pub after: Snapshot,
}

impl DiffPayload {
    /// Payload for a newly created subject
    pub fn created(after: Snapshot) -> Self {
        Self {
            before: Details::Absent,
            after,
        }
    }

    /// Payload for an updated subject
    pub fn updated(before: Snapshot, after: Snapshot) -> Self {
        Self {
            before: Details::Present(before),
            after,
        }
    }

    /// Persisted text form
    pub fn encode(&self) -> UserDirResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse the persisted text form
    pub fn decode(text: &str) -> UserDirResult<Self> {
        serde_json::from_str(text).map_err(|e| UserDirError::MalformedPayload(e.to_string()))
    }

    /// Names of fields whose value differs between before and after.
    /// For a creation every field counts as changed.
    pub fn changed_fields(&self) -> Vec<String> {
        let Some(before) = self.before.snapshot() else {
            return self.after.fields().map(|(name, _)| name.clone()).collect();
        };

        let mut changed: Vec<String> = before
            .fields()
            .filter(|(name, value)| self.after.get(name) != Some(*value))
            .map(|(name, _)| name.clone())
            .collect();

        changed.extend(
            self.after
                .fields()
                .filter(|(name, _)| !before.contains(name))
                .map(|(name, _)| name.clone()),
        );

        changed
    }

    /// One-line "field: old -> new" summary of an update.
    /// `None` for creations and for updates that changed nothing.
    pub fn summary(&self) -> Option<String> {
        let before = self.before.snapshot()?;

        let mut changes = Vec::new();

        for (name, before_val) in before.fields() {
            match self.after.get(name) {
                Some(after_val) if after_val != before_val => changes.push(format!(
                    "{}: {} -> {}",
                    name,
                    format_value(before_val),
                    format_value(after_val)
                )),
                Some(_) => {}
                None => changes.push(format!("{}: {} -> (removed)", name, format_value(before_val))),
            }
        }

        for (name, after_val) in self.after.fields() {
            if !before.contains(name) {
                changes.push(format!("{}: (added) -> {}", name, format_value(after_val)));
            }
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join(", "))
        }
    }
}

/// Encode a before/after pair into the persisted text form
pub fn encode(before: Details, after: Snapshot) -> UserDirResult<String> {
    DiffPayload { before, after }.encode()
}

/// Decode the persisted text form back into a before/after pair
pub fn decode(text: &str) -> UserDirResult<DiffPayload> {
    DiffPayload::decode(text)
}

/// Render one payload section as `"field: rawValue field: rawValue"`
///
/// Values appear as their raw JSON text (strings keep their quotes). The
/// absent marker, a missing section and any non-map value render as "".
pub fn flatten(section: Option<&Value>) -> String {
    let Some(Value::Object(fields)) = section else {
        return String::new();
    };

    let mut output = String::new();
    for (name, value) in fields {
        output.push_str(&format!("{}: {} ", name, value));
    }
    output.trim().to_string()
}

/// Flatten both sections of a persisted payload into (old, new) strings
///
/// Text that does not parse, or does not have the expected shape, yields
/// empty strings for whatever cannot be read.
pub fn flatten_sections(text: &str) -> (String, String) {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(members)) => (
            flatten(members.get(OLD_DETAILS)),
            flatten(members.get(NEW_DETAILS)),
        ),
        Ok(other) => {
            warn!(found = value_kind(&other), "audit payload is not an object");
            (String::new(), String::new())
        }
        Err(e) => {
            warn!(error = %e, "audit payload does not parse");
            (String::new(), String::new())
        }
    }
}

/// Format a JSON value for the change summary
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if s.chars().count() > 50 {
                let head: String = s.chars().take(47).collect();
                format!("\"{}...\"", head)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{User, UserId};
    use chrono::NaiveDate;
    use serde_json::json;

    fn peter() -> User {
        let mut user = User::new("Peter", "Loew", "ploew@example.com")
            .with_date_of_birth(NaiveDate::from_ymd_opt(1968, 1, 8).unwrap());
        user.id = UserId::new(1);
        user
    }

    fn snapshot(user: &User) -> Snapshot {
        Snapshot::capture(user).unwrap()
    }

    #[test]
    fn test_created_payload_text() {
        let payload = DiffPayload::created(snapshot(&peter()));
        let text = payload.encode().unwrap();

        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[OLD_DETAILS], json!("N/A"));
        assert_eq!(value[NEW_DETAILS]["Forename"], json!("Peter"));
        assert_eq!(value.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_round_trip_created() {
        let payload = DiffPayload::created(snapshot(&peter()));
        let decoded = decode(&payload.encode().unwrap()).unwrap();

        assert!(decoded.before.is_absent());
        assert_eq!(decoded, payload);
    }

    #[test]
    fn test_round_trip_updated() {
        let before = peter();
        let mut after = before.clone();
        after.surname = "Loew-Smith".to_string();

        let text = encode(Details::Present(snapshot(&before)), snapshot(&after)).unwrap();
        let decoded = decode(&text).unwrap();

        assert_eq!(decoded.before, Details::Present(snapshot(&before)));
        assert_eq!(decoded.after, snapshot(&after));
    }

    #[test]
    fn test_field_holding_marker_text_is_not_absent() {
        let mut user = peter();
        user.forename = "N/A".to_string();

        let payload = DiffPayload::updated(snapshot(&user), snapshot(&user));
        let decoded = decode(&payload.encode().unwrap()).unwrap();

        let before = decoded.before.snapshot().unwrap();
        assert_eq!(before.get("Forename"), Some(&json!("N/A")));
    }

    #[test]
    fn test_decode_rejects_wrong_shapes() {
        for text in [
            "not json",
            "[]",
            r#"{"OldDetails": "N/A"}"#,
            r#"{"OldDetails": "none", "NewDetails": {}}"#,
            r#"{"OldDetails": "N/A", "NewDetails": "N/A"}"#,
            r#"{"OldDetails": "N/A", "NewDetails": {}, "Extra": 1}"#,
        ] {
            let err = decode(text).unwrap_err();
            assert!(
                matches!(err, UserDirError::MalformedPayload(_)),
                "{} should be malformed",
                text
            );
        }
    }

    #[test]
    fn test_flatten_renders_raw_values_in_order() {
        let value = serde_json::to_value(snapshot(&peter())).unwrap();
        assert_eq!(
            flatten(Some(&value)),
            r#"Id: 1 Forename: "Peter" Surname: "Loew" Email: "ploew@example.com" IsActive: true DateOfBirth: "1968-01-08""#
        );
    }

    #[test]
    fn test_flatten_tolerates_unexpected_sections() {
        assert_eq!(flatten(None), "");
        assert_eq!(flatten(Some(&json!("N/A"))), "");
        assert_eq!(flatten(Some(&json!([1, 2]))), "");
        assert_eq!(flatten(Some(&json!({}))), "");
    }

    #[test]
    fn test_flatten_sections() {
        let payload = DiffPayload::created(snapshot(&peter()));
        let (old, new) = flatten_sections(&payload.encode().unwrap());

        assert_eq!(old, "");
        assert!(new.starts_with("Id: 1 Forename: \"Peter\""));
    }

    #[test]
    fn test_flatten_sections_degrades_on_malformed_text() {
        assert_eq!(flatten_sections("{broken"), (String::new(), String::new()));
        assert_eq!(flatten_sections("42"), (String::new(), String::new()));
        assert_eq!(
            flatten_sections(r#"{"NewDetails": {"Id": 3}}"#),
            (String::new(), "Id: 3".to_string())
        );
    }

    #[test]
    fn test_changed_fields() {
        let before = peter();
        let mut after = before.clone();
        after.surname = "Loew-Smith".to_string();
        after.is_active = false;

        let payload = DiffPayload::updated(snapshot(&before), snapshot(&after));
        assert_eq!(payload.changed_fields(), vec!["Surname", "IsActive"]);

        let created = DiffPayload::created(snapshot(&after));
        assert_eq!(created.changed_fields().len(), 6);
    }

    #[test]
    fn test_summary() {
        let before = peter();
        let mut after = before.clone();
        after.surname = "Loew-Smith".to_string();

        let payload = DiffPayload::updated(snapshot(&before), snapshot(&after));
        assert_eq!(
            payload.summary().unwrap(),
            "Surname: \"Loew\" -> \"Loew-Smith\""
        );

        let unchanged = DiffPayload::updated(snapshot(&before), snapshot(&before));
        assert!(unchanged.summary().is_none());
        assert!(DiffPayload::created(snapshot(&before)).summary().is_none());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(format_value(&json!(true)), "true");
        assert_eq!(format_value(&json!(42)), "42");
        assert_eq!(format_value(&json!("test")), "\"test\"");
        assert_eq!(format_value(&json!([1, 2, 3])), "[3 items]");
        assert!(format_value(&json!("a".repeat(100))).ends_with("...\""));
    }
}
