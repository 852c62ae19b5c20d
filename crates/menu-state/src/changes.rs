//! Pending change sets
//!
//! Derived, never stored as a source of truth: the top-level fields whose
//! serialized form differs between `current` and `original`.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Top-level field name → new value, for changed fields only
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PendingChanges(BTreeMap<String, Value>);

impl PendingChanges {
    /// Diff two encoded documents
    ///
    /// Fields present in `original` but absent from `current` map to `null`.
    /// Non-object values compare as a single field named `""`.
    #[must_use]
    pub fn between(original: &Value, current: &Value) -> Self {
        let mut changes = BTreeMap::new();
        match (original.as_object(), current.as_object()) {
            (Some(before), Some(after)) => {
                for (key, value) in after {
                    if before.get(key) != Some(value) {
                        changes.insert(key.clone(), value.clone());
                    }
                }
                for key in before.keys().filter(|k| !after.contains_key(*k)) {
                    changes.insert(key.clone(), Value::Null);
                }
            }
            _ if original != current => {
                changes.insert(String::new(), current.clone());
            }
            _ => {}
        }
        Self(changes)
    }

    /// No field differs
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of changed fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// New value of a changed field
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Changed field names, sorted
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// As a JSON object
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect::<Map<_, _>>())
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_changed_fields_listed() {
        let before = json!({"a": 1, "b": [1, 2], "c": "x"});
        let after = json!({"a": 1, "b": [2, 1], "c": "x"});
        let changes = PendingChanges::between(&before, &after);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes.get("b"), Some(&json!([2, 1])));
    }

    #[test]
    fn removed_field_maps_to_null() {
        let changes = PendingChanges::between(&json!({"a": 1}), &json!({}));
        assert_eq!(changes.get("a"), Some(&Value::Null));
    }

    #[test]
    fn identical_is_empty() {
        let v = json!({"nested": {"deep": [1, {"x": true}]}});
        assert!(PendingChanges::between(&v, &v.clone()).is_empty());
    }
}
