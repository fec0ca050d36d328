use crate::utils::error::{ReportError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ReportError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ReportError::InvalidConfigValue {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ReportError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_scheme(field_name: &str, scheme: &str) -> Result<()> {
    match scheme {
        "http" | "https" => Ok(()),
        other => Err(ReportError::InvalidConfigValue {
            field: field_name.to_string(),
            value: other.to_string(),
            reason: "Scheme must be http or https".to_string(),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ReportError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Rejects `${VAR}` placeholders left behind when the variable was not set.
pub fn validate_resolved(field_name: &str, value: &str) -> Result<()> {
    if value.contains("${") {
        return Err(ReportError::MissingConfig {
            field: format!("{} (unresolved placeholder {})", field_name, value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| ReportError::MissingConfig {
        field: field_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("api", "https://api.mist.com/api/v1").is_ok());
        assert!(validate_url("api", "http://127.0.0.1:8080/api/v1").is_ok());
        assert!(validate_url("api", "").is_err());
        assert!(validate_url("api", "api.mist.com").is_err());
        assert!(validate_url("api", "ftp://api.mist.com").is_err());
    }

    #[test]
    fn test_validate_scheme() {
        assert!(validate_scheme("mist.scheme", "https").is_ok());
        assert!(validate_scheme("mist.scheme", "wss").is_err());
    }

    #[test]
    fn test_validate_resolved() {
        assert!(validate_resolved("mist.api_token", "abc").is_ok());
        assert!(matches!(
            validate_resolved("mist.api_token", "${MIST_API_TOKEN}"),
            Err(ReportError::MissingConfig { .. })
        ));
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("org".to_string());
        let absent: Option<String> = None;
        assert_eq!(validate_required_field("org_id", &present).unwrap(), "org");
        assert!(validate_required_field("org_id", &absent).is_err());
    }
}
