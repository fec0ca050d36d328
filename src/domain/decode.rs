//! serde decoding of API payloads into domain types.
//!
//! Decoding goes through `serde_path_to_error`, so a failure at any depth
//! reports the full path of the offending field (`results[1].id`,
//! `data.connectivity.auth_failure.scope`, ...).

use crate::utils::error::{SchemaValidationError, SchemaViolation};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use serde_path_to_error::Segment;

pub type SchemaResult<T> = std::result::Result<T, SchemaValidationError>;

/// Path used when the payload root itself is rejected.
pub const ROOT_PATH: &str = "$";

/// Decodes `value` into `T`, naming the deepest failing field on error.
pub fn decode<T: DeserializeOwned>(value: &Value) -> SchemaResult<T> {
    serde_path_to_error::deserialize(value).map_err(|err| {
        let path = render_path(err.path());
        let message = err.inner().to_string();
        schema_error(path, &message)
    })
}

/// `deserialize_with` helper: `null` decodes like an absent field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Joins `child` onto a dotted path; an empty parent yields `child` alone.
pub fn join_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{}.{}", parent, child)
    }
}

fn render_path(path: &serde_path_to_error::Path) -> String {
    let mut rendered = String::new();
    for segment in path.iter() {
        match segment {
            Segment::Seq { index } => {
                if rendered.is_empty() {
                    rendered.push_str(ROOT_PATH);
                }
                rendered.push_str(&format!("[{}]", index));
            }
            Segment::Map { key } => rendered = join_path(&rendered, key),
            Segment::Enum { variant } => rendered = join_path(&rendered, variant),
            Segment::Unknown => rendered = join_path(&rendered, "?"),
        }
    }
    rendered
}

// A missing field is reported by serde at the enclosing struct, so its name is
// recovered from the message and appended to the path.
fn schema_error(path: String, message: &str) -> SchemaValidationError {
    if let Some(field) = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
    {
        return SchemaValidationError::new(join_path(&path, field), SchemaViolation::MissingField);
    }

    let path = if path.is_empty() {
        ROOT_PATH.to_string()
    } else {
        path
    };

    let violation = if message.starts_with("invalid type: null") {
        SchemaViolation::MissingField
    } else if message.ends_with("expected a sequence") {
        SchemaViolation::NotAnArray
    } else if message.ends_with("expected a map") || message.contains("expected struct") {
        SchemaViolation::NotAnObject
    } else {
        SchemaViolation::WrongType {
            detail: message.to_string(),
        }
    };
    SchemaValidationError::new(path, violation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: String,
        #[serde(default, deserialize_with = "null_as_default")]
        tags: Vec<String>,
        #[serde(default)]
        name: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    struct Page {
        data: Inner,
    }

    #[derive(Debug, Deserialize)]
    struct Inner {
        items: Vec<Item>,
    }

    #[test]
    fn test_defaults_and_null() {
        let item: Item = decode(&json!({"id": "a", "tags": null, "extra": 1})).unwrap();
        assert_eq!(
            item,
            Item {
                id: "a".to_string(),
                tags: vec![],
                name: None
            }
        );
    }

    #[test]
    fn test_missing_field_names_nested_path() {
        let err = decode::<Page>(&json!({"data": {"items": [{"id": "a"}, {"tags": []}]}}))
            .unwrap_err();
        assert_eq!(err.path, "data.items[1].id");
        assert_eq!(err.violation, SchemaViolation::MissingField);
    }

    #[test]
    fn test_null_mandatory_field_is_missing() {
        let err = decode::<Item>(&json!({"id": null})).unwrap_err();
        assert_eq!(err.path, "id");
        assert_eq!(err.violation, SchemaViolation::MissingField);
    }

    #[test]
    fn test_wrong_type_names_field() {
        let err = decode::<Item>(&json!({"id": "a", "tags": [1]})).unwrap_err();
        assert_eq!(err.path, "tags[0]");
        assert!(matches!(err.violation, SchemaViolation::WrongType { .. }));
    }

    #[test]
    fn test_root_violations() {
        let err = decode::<Inner>(&json!("text")).unwrap_err();
        assert_eq!(err.path, ROOT_PATH);
        assert_eq!(err.violation, SchemaViolation::NotAnObject);

        let err = decode::<Vec<Item>>(&json!({})).unwrap_err();
        assert_eq!(err.path, ROOT_PATH);
        assert_eq!(err.violation, SchemaViolation::NotAnArray);
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "data"), "data");
        assert_eq!(join_path("data", "connectivity"), "data.connectivity");
    }
}
