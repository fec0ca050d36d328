use crate::domain::decode::{decode, null_as_default, SchemaResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One alarm returned by the site alarm search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub aps: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bssids: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub client_count: i64,
    pub count: i64,
    pub group: String,
    pub hostnames: Vec<String>,
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub incident_count: i64,
    pub last_seen: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub macs: Vec<String>,
    pub org_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reasons: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub servers: Vec<String>,
    pub severity: String,
    pub site_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub switches: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ssids: Vec<String>,
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub alert_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vlans: Vec<i64>,
}

/// Result page of a site alarm search, in the order the API returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteAlerts {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<AlertRecord>,
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub limit: Option<i64>,
    pub total: Option<i64>,
}

impl SiteAlerts {
    pub fn from_value(value: &Value) -> SchemaResult<Self> {
        decode(value)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of records carrying the given severity.
    pub fn count_severity(&self, severity: &str) -> usize {
        self.results
            .iter()
            .filter(|record| record.severity == severity)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::SchemaViolation;
    use serde_json::json;

    const OPTIONAL_FIELDS: [&str; 10] = [
        "aps",
        "bssids",
        "client_count",
        "incident_count",
        "macs",
        "reasons",
        "servers",
        "switches",
        "ssids",
        "vlans",
    ];

    fn full_record() -> Value {
        json!({
            "aps": ["5c5b35000001"],
            "bssids": ["5c5b35000011"],
            "client_count": 4,
            "count": 2,
            "group": "infrastructure",
            "hostnames": ["ap-lobby"],
            "id": "0d8f1a52-1b1c-4a8e-9a45-000000000001",
            "incident_count": 1,
            "last_seen": 1_700_000_300,
            "macs": ["5c5b35000001"],
            "org_id": "org-1",
            "reasons": ["dhcp timeout"],
            "servers": ["10.0.0.1"],
            "severity": "critical",
            "site_id": "site-1",
            "switches": ["sw-core"],
            "ssids": ["corp"],
            "timestamp": 1_700_000_000,
            "type": "device_down",
            "vlans": [10, 20]
        })
    }

    #[test]
    fn test_full_record() {
        let alerts = SiteAlerts::from_value(&json!({
            "results": [full_record()],
            "start": 1, "end": 2, "limit": 100, "total": 1
        }))
        .unwrap();

        assert_eq!(alerts.len(), 1);
        let record = &alerts.results[0];
        assert_eq!(record.alert_type, "device_down");
        assert_eq!(record.vlans, vec![10, 20]);
        assert_eq!(alerts.limit, Some(100));
    }

    #[test]
    fn test_each_optional_field_defaults() {
        for field in OPTIONAL_FIELDS {
            let mut record = full_record();
            record.as_object_mut().unwrap().remove(field);

            let alerts = SiteAlerts::from_value(&json!({"results": [record]}))
                .unwrap_or_else(|e| panic!("omitting {} failed: {}", field, e));
            let value = serde_json::to_value(&alerts.results[0]).unwrap();

            let expected = if field.ends_with("count") {
                json!(0)
            } else {
                json!([])
            };
            assert_eq!(value[field], expected, "default for {}", field);
        }
    }

    #[test]
    fn test_null_optional_field_defaults() {
        let mut record = full_record();
        record["macs"] = Value::Null;
        let alerts = SiteAlerts::from_value(&json!({"results": [record]})).unwrap();
        assert!(alerts.results[0].macs.is_empty());
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let mut record = full_record();
        record.as_object_mut().unwrap().remove("id");

        let err = SiteAlerts::from_value(&json!({"results": [full_record(), record]})).unwrap_err();
        assert_eq!(err.path, "results[1].id");
        assert_eq!(err.field(), "id");
        assert_eq!(err.violation, SchemaViolation::MissingField);
    }

    #[test]
    fn test_hostnames_is_mandatory() {
        let mut record = full_record();
        record.as_object_mut().unwrap().remove("hostnames");

        let err = SiteAlerts::from_value(&json!({"results": [record]})).unwrap_err();
        assert_eq!(err.field(), "hostnames");
    }

    #[test]
    fn test_null_mandatory_field_is_missing() {
        let mut record = full_record();
        record["severity"] = Value::Null;

        let err = SiteAlerts::from_value(&json!({"results": [record]})).unwrap_err();
        assert_eq!(err.path, "results[0].severity");
        assert_eq!(err.violation, SchemaViolation::MissingField);
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let mut record = full_record();
        record["count"] = json!("two");

        let err = SiteAlerts::from_value(&json!({"results": [record]})).unwrap_err();
        assert_eq!(err.path, "results[0].count");
        assert!(matches!(err.violation, SchemaViolation::WrongType { .. }));
    }

    #[test]
    fn test_empty_payload() {
        let alerts = SiteAlerts::from_value(&json!({})).unwrap();
        assert!(alerts.is_empty());
        assert_eq!(alerts.total, None);
    }

    #[test]
    fn test_order_and_severity_counts() {
        let mut second = full_record();
        second["id"] = json!("second");
        second["severity"] = json!("info");

        let alerts =
            SiteAlerts::from_value(&json!({"results": [full_record(), second]})).unwrap();
        assert_eq!(alerts.results[1].id, "second");
        assert_eq!(alerts.count_severity("critical"), 1);
        assert_eq!(alerts.count_severity("info"), 1);
        assert_eq!(alerts.count_severity("warn"), 0);
    }
}
