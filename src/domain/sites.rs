use crate::domain::decode::{decode, SchemaResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sites of an organization, passed to the template as a plain list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteList {
    sites: Vec<Map<String, Value>>,
}

impl SiteList {
    pub fn from_value(value: &Value) -> SchemaResult<Self> {
        decode(value)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sites
            .iter()
            .filter_map(|site| site.get("name").and_then(Value::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decode::ROOT_PATH;
    use crate::utils::error::SchemaViolation;
    use serde_json::json;

    #[test]
    fn test_site_list() {
        let sites = SiteList::from_value(&json!([
            {"id": "s1", "name": "HQ", "timezone": "America/Chicago"},
            {"id": "s2", "name": "Branch"}
        ]))
        .unwrap();

        assert_eq!(sites.len(), 2);
        assert_eq!(sites.names().collect::<Vec<_>>(), vec!["HQ", "Branch"]);
        assert_eq!(serde_json::to_value(&sites).unwrap()[1]["id"], json!("s2"));
    }

    #[test]
    fn test_site_list_rejects_non_array() {
        let err = SiteList::from_value(&json!({"id": "s1"})).unwrap_err();
        assert_eq!(err.path, ROOT_PATH);
        assert_eq!(err.violation, SchemaViolation::NotAnArray);
    }

    #[test]
    fn test_site_list_rejects_non_object_member() {
        let err = SiteList::from_value(&json!([{"id": "s1"}, "s2"])).unwrap_err();
        assert_eq!(err.path, "$[1]");
        assert_eq!(err.violation, SchemaViolation::NotAnObject);
    }
}
