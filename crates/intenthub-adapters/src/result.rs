//! The `{success, ...}` envelope every adapter operation returns.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::error::AdapterError;

/// Outcome of one adapter operation.
///
/// Serialises as `{"success": true, <payload keys>}` or
/// `{"success": false, "error": "<message>"}`.  The failure message is always
/// human-readable text, never a structured code.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceResult {
    Success(Map<String, Value>),
    Failure(String),
}

impl ServiceResult {
    /// Build a success from a JSON payload.
    ///
    /// Objects are used as-is; any other value is wrapped as `{"data": v}`.
    pub fn success(payload: Value) -> Self {
        match payload {
            Value::Object(map) => Self::Success(map),
            other => {
                let mut map = Map::new();
                map.insert("data".into(), other);
                Self::Success(map)
            }
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The success payload, if any.
    pub fn payload(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Success(map) => Some(map),
            Self::Failure(_) => None,
        }
    }

    /// The failure message, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(message) => Some(message),
        }
    }

    /// Look up a payload key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload().and_then(|map| map.get(key))
    }

    /// Render the envelope as a JSON value.
    pub fn to_envelope(&self) -> Value {
        let mut map = Map::new();
        match self {
            Self::Success(payload) => {
                map.insert("success".into(), Value::Bool(true));
                for (key, value) in payload {
                    if key != "success" {
                        map.insert(key.clone(), value.clone());
                    }
                }
            }
            Self::Failure(message) => {
                map.insert("success".into(), Value::Bool(false));
                map.insert("error".into(), Value::String(message.clone()));
            }
        }
        Value::Object(map)
    }
}

impl From<AdapterError> for ServiceResult {
    fn from(err: AdapterError) -> Self {
        Self::Failure(err.to_string())
    }
}

impl From<crate::error::Result<Value>> for ServiceResult {
    fn from(result: crate::error::Result<Value>) -> Self {
        match result {
            Ok(payload) => Self::success(payload),
            Err(err) => err.into(),
        }
    }
}

impl Serialize for ServiceResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(payload) => {
                let extra = payload.keys().filter(|k| *k != "success").count();
                let mut map = serializer.serialize_map(Some(extra + 1))?;
                map.serialize_entry("success", &true)?;
                for (key, value) in payload {
                    if key != "success" {
                        map.serialize_entry(key, value)?;
                    }
                }
                map.end()
            }
            Self::Failure(message) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", message)?;
                map.end()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn success_envelope_flattens_payload() {
        let result = ServiceResult::success(json!({"datasets": ["a", "b"]}));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"success": true, "datasets": ["a", "b"]})
        );
        assert_eq!(result.to_envelope(), serde_json::to_value(&result).unwrap());
    }

    #[test]
    fn failure_envelope_carries_message() {
        let result = ServiceResult::failure("boom");
        assert!(!result.is_success());
        assert_eq!(result.error(), Some("boom"));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"success": false, "error": "boom"})
        );
    }

    #[test]
    fn non_object_payload_is_wrapped() {
        let result = ServiceResult::success(json!([1, 2]));
        assert_eq!(result.get("data"), Some(&json!([1, 2])));
    }

    #[test]
    fn unknown_operation_error_renders_unknown_method() {
        let result: ServiceResult = AdapterError::UnknownOperation {
            operation: "drop_everything".into(),
        }
        .into();
        assert_eq!(result.error(), Some("Unknown method: drop_everything"));
    }

    #[test]
    fn payload_cannot_override_success_flag() {
        let result = ServiceResult::success(json!({"success": false, "x": 1}));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"success": true, "x": 1})
        );
    }
}
