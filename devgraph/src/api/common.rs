//! Common types and utilities for the Devgraph API

use serde::{Deserialize, Serialize, Serializer};

/// Error body returned by the API, e.g. `{"detail": "Not authorized"}`.
/// Validation failures carry a list of objects instead of a string.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub detail: serde_json::Value,
}

#[derive(Debug, thiserror::Error)]
#[error("API error details: {detail}")]
pub struct ApiErrorDetails {
    pub detail: String,
}

impl ApiErrorResponse {
    /// Flatten `detail` into one human readable line
    pub fn into_details(self) -> ApiErrorDetails {
        let detail = match self.detail {
            serde_json::Value::String(s) => s,
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.get("msg")
                        .and_then(|m| m.as_str())
                        .map(str::to_string)
                        .unwrap_or_else(|| item.to_string())
                })
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        };
        ApiErrorDetails { detail }
    }
}

/// Three-state field for update payloads
///
/// `Omit` leaves the field out of the JSON body, `Null` sends an explicit
/// `null` to clear it and `Value` sets it. Pair with
/// `#[serde(default, skip_serializing_if = "Nullable::is_omitted")]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Nullable<T> {
    #[default]
    Omit,
    Null,
    Value(T),
}

impl<T> Nullable<T> {
    pub fn is_omitted(&self) -> bool {
        matches!(self, Nullable::Omit)
    }
}

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Nullable::Omit | Nullable::Null => serializer.serialize_none(),
            Nullable::Value(v) => v.serialize(serializer),
        }
    }
}

/// Serde helper for maps and lists that are only sent when non-empty
pub fn is_empty_or_none<T: IsEmpty>(value: &Option<T>) -> bool {
    value.as_ref().map_or(true, IsEmpty::is_empty)
}

pub trait IsEmpty {
    fn is_empty(&self) -> bool;
}

impl<T> IsEmpty for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl<K, V> IsEmpty for std::collections::HashMap<K, V> {
    fn is_empty(&self) -> bool {
        std::collections::HashMap::is_empty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Serialize, Default)]
    struct Patch {
        #[serde(skip_serializing_if = "Nullable::is_omitted")]
        name: Nullable<String>,
        #[serde(skip_serializing_if = "Nullable::is_omitted")]
        description: Nullable<String>,
        #[serde(skip_serializing_if = "is_empty_or_none")]
        tools: Option<Vec<String>>,
        #[serde(skip_serializing_if = "is_empty_or_none")]
        headers: Option<HashMap<String, String>>,
    }

    #[test]
    fn test_nullable_serializes_three_states() {
        let patch = Patch {
            name: Nullable::Value("renamed".to_string()),
            description: Nullable::Null,
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({"name": "renamed", "description": null})
        );

        assert_eq!(
            serde_json::to_value(Patch::default()).unwrap(),
            serde_json::json!({})
        );
    }

    #[test]
    fn test_empty_collections_are_skipped() {
        let patch = Patch {
            tools: Some(vec![]),
            headers: Some(HashMap::from([("X".to_string(), "1".to_string())])),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({"headers": {"X": "1"}})
        );
    }

    #[test]
    fn test_error_details_flatten_validation_lists() {
        let body: ApiErrorResponse = serde_json::from_str(
            r#"{"detail":[{"loc":["body","name"],"msg":"field required"},{"msg":"too short"}]}"#,
        )
        .unwrap();
        assert_eq!(body.into_details().detail, "field required; too short");

        let body: ApiErrorResponse = serde_json::from_str(r#"{"detail":"Forbidden"}"#).unwrap();
        assert_eq!(body.into_details().detail, "Forbidden");
    }
}
