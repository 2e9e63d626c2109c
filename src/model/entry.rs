//! Customer entries as served by the entries endpoint
//!
//! The endpoint's element shape is not trusted: every field is optional and
//! decoded leniently so one odd record never sinks the whole list.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// Avatar letter used when a customer has no name
const DEFAULT_INITIAL: &str = "C";

/// Opaque identifier of a customer entry
///
/// The server may send numbers or strings; both are kept in textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single customer record
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Entry {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<EntryId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub mobile: Option<String>,
}

impl Entry {
    /// Decode one element of the response array
    ///
    /// Anything that is not a JSON object becomes an entry with no fields.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_else(|err| {
                tracing::debug!(error = %err, "entry element could not be decoded");
                Entry::default()
            }),
            other => {
                tracing::debug!(kind = value_kind(&other), "non-object entry element");
                Entry::default()
            }
        }
    }

    /// Name for display, empty when absent
    pub fn name_text(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Mobile number for display, empty when absent
    pub fn mobile_text(&self) -> &str {
        self.mobile.as_deref().unwrap_or_default()
    }

    /// Avatar initial: first letter of the trimmed name, upper-cased
    ///
    /// Falls back to "C" only when the name is absent or empty. A name made
    /// of whitespace yields an empty initial.
    pub fn initial(&self) -> String {
        let source = match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_INITIAL,
        };

        source
            .trim()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }

    /// Whether name or mobile contains `needle`
    ///
    /// `needle` must already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        self.name_text().to_lowercase().contains(needle)
            || self.mobile_text().to_lowercase().contains(needle)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Scalars become text, everything else is treated as absent
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(scalar_text))
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<EntryId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.map(EntryId))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(name: Option<&str>, mobile: Option<&str>) -> Entry {
        Entry {
            id: Some(EntryId::new("1")),
            name: name.map(str::to_string),
            mobile: mobile.map(str::to_string),
        }
    }

    #[test]
    fn test_decode_full_object() {
        let decoded = Entry::from_value(json!({
            "id": 7,
            "name": "Asha Rao",
            "mobile": "9000022222",
            "createdAt": "2024-01-01"
        }));

        assert_eq!(decoded.id, Some(EntryId::new("7")));
        assert_eq!(decoded.name_text(), "Asha Rao");
        assert_eq!(decoded.mobile_text(), "9000022222");
    }

    #[test]
    fn test_decode_missing_and_odd_fields() {
        let decoded = Entry::from_value(json!({
            "id": "abc",
            "name": null,
            "mobile": 9000011111u64
        }));

        assert_eq!(decoded.id, Some(EntryId::new("abc")));
        assert_eq!(decoded.name, None);
        assert_eq!(decoded.mobile.as_deref(), Some("9000011111"));

        let nested = Entry::from_value(json!({ "name": { "first": "A" } }));
        assert_eq!(nested.name, None);
    }

    #[test]
    fn test_decode_non_object_element() {
        assert_eq!(Entry::from_value(json!("Rahul")), Entry::default());
        assert_eq!(Entry::from_value(json!([1, "Rahul", "9000"])), Entry::default());
        assert_eq!(Entry::from_value(Value::Null), Entry::default());
    }

    #[test]
    fn test_initial() {
        assert_eq!(entry(Some("asha"), None).initial(), "A");
        assert_eq!(entry(Some("  rahul"), None).initial(), "R");
        assert_eq!(entry(None, None).initial(), "C");
        assert_eq!(entry(Some(""), None).initial(), "C");
        assert_eq!(entry(Some("   "), None).initial(), "");
        assert_eq!(entry(Some("ßeta"), None).initial(), "SS");
    }

    #[test]
    fn test_matches_is_case_insensitive_on_entry_side() {
        let e = entry(Some("Asha"), Some("9988776655"));
        assert!(e.matches("ash"));
        assert!(e.matches("8877"));
        assert!(!e.matches("rahul"));
    }

    #[test]
    fn test_matches_absent_fields() {
        let e = Entry {
            id: Some(EntryId::new("1")),
            name: None,
            mobile: None,
        };
        assert!(!e.matches("x"));
        assert!(e.matches(""));
    }
}
