use std::fmt;
use thiserror::Error;

/// Upper bound for response bodies carried inside error values.
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{method} {url} failed: {source}")]
    Network {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {url} returned HTTP {status}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    #[error("response from {url} is not valid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn truncate_body(body: &str) -> String {
        if body.chars().count() <= MAX_ERROR_BODY_CHARS {
            return body.to_string();
        }
        let mut truncated: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        truncated.push_str("...");
        truncated
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    MissingField,
    WrongType { detail: String },
    NotAnObject,
    NotAnArray,
    CounterOverflow,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaViolation::MissingField => write!(f, "required field is missing"),
            SchemaViolation::WrongType { detail } => write!(f, "{}", detail),
            SchemaViolation::NotAnObject => write!(f, "expected a JSON object"),
            SchemaViolation::NotAnArray => write!(f, "expected a JSON array"),
            SchemaViolation::CounterOverflow => write!(f, "counters overflow a 64-bit total"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid field `{path}`: {violation}")]
pub struct SchemaValidationError {
    pub path: String,
    pub violation: SchemaViolation,
}

impl SchemaValidationError {
    pub fn new(path: impl Into<String>, violation: SchemaViolation) -> Self {
        Self {
            path: path.into(),
            violation,
        }
    }

    /// Last segment of the failing path, without any array index.
    pub fn field(&self) -> &str {
        let last = self.path.rsplit('.').next().unwrap_or(&self.path);
        match last.find('[') {
            Some(idx) if idx > 0 => &last[..idx],
            _ => last,
        }
    }
}

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("unknown template `{name}`")]
    Unknown { name: String },

    #[error("failed to render template `{name}`: {source}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("failed to load template `{name}`: {source}")]
    Load {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Schema(#[from] SchemaValidationError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Message delivery failed: {message}")]
    Delivery { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Delivery,
}

impl ReportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReportError::Transport(_) => ErrorCategory::Network,
            ReportError::Schema(_) => ErrorCategory::Data,
            ReportError::Template(_)
            | ReportError::Io(_)
            | ReportError::ConfigValidation { .. }
            | ReportError::InvalidConfigValue { .. }
            | ReportError::MissingConfig { .. } => ErrorCategory::Configuration,
            ReportError::Delivery { .. } => ErrorCategory::Delivery,
        }
    }

    /// Text suitable for showing to the person who asked for the report.
    pub fn user_friendly_message(&self) -> String {
        match self {
            ReportError::Transport(TransportError::Status { status, .. }) => match *status {
                401 | 403 => "The Mist API rejected our credentials.".to_string(),
                404 => "The requested site or organization was not found.".to_string(),
                _ => format!("The Mist API answered with HTTP {}.", status),
            },
            ReportError::Transport(_) => "Could not reach the Mist API.".to_string(),
            ReportError::Schema(err) => format!(
                "The Mist API returned data in an unexpected shape (field `{}`).",
                err.path
            ),
            ReportError::Template(_) => "The report template is misconfigured.".to_string(),
            ReportError::Delivery { .. } => "The report could not be posted.".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ReportError::Transport(TransportError::Status { status: 401 | 403, .. }) => {
                "Check that MIST_API_TOKEN is valid and has access to the organization"
            }
            ReportError::Transport(TransportError::Status { status: 404, .. }) => {
                "Check the site or organization identifier"
            }
            ReportError::Transport(_) => "Check network connectivity and the configured API host",
            ReportError::Schema(_) => "The upstream schema may have changed; inspect the payload",
            ReportError::Template(_) => "Check the template directory and template names",
            ReportError::Delivery { .. } => "Check the Slack bot token and channel",
            _ => "Review the configuration values and try again",
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
