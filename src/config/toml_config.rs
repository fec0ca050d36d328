use crate::adapters::http::{DEFAULT_API_HOST, DEFAULT_SCHEME};
use crate::adapters::slack::DEFAULT_SLACK_API_BASE;
use crate::core::ConfigProvider;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_resolved, validate_scheme, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub mist: MistConfig,
    pub slack: Option<SlackConfig>,
    pub templates: Option<TemplatesConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MistConfig {
    pub api_token: String,
    pub org_id: Option<String>,
    pub host: Option<String>,
    pub scheme: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    pub bot_token: String,
    pub channel: String,
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatesConfig {
    pub dir: Option<PathBuf>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReportError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration text after replacing `${VAR}` with environment values.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ReportError::ConfigValidation {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Unset variables are left as written and rejected by `validate`.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ReportError::ConfigValidation {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("mist.api_token", &self.mist.api_token)?;
        validate_resolved("mist.api_token", &self.mist.api_token)?;
        if let Some(org_id) = &self.mist.org_id {
            validate_resolved("mist.org_id", org_id)?;
        }
        validate_non_empty_string("mist.host", self.api_host())?;
        validate_scheme("mist.scheme", self.api_scheme())?;

        if let Some(slack) = &self.slack {
            validate_non_empty_string("slack.bot_token", &slack.bot_token)?;
            validate_resolved("slack.bot_token", &slack.bot_token)?;
            validate_non_empty_string("slack.channel", &slack.channel)?;
            validate_resolved("slack.channel", &slack.channel)?;
            if let Some(api_base) = &slack.api_base {
                validate_url("slack.api_base", api_base)?;
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn api_scheme(&self) -> &str {
        self.mist.scheme.as_deref().unwrap_or(DEFAULT_SCHEME)
    }

    fn api_host(&self) -> &str {
        self.mist.host.as_deref().unwrap_or(DEFAULT_API_HOST)
    }

    fn api_token(&self) -> &str {
        &self.mist.api_token
    }

    fn org_id(&self) -> Option<&str> {
        self.mist.org_id.as_deref()
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.mist.timeout_seconds.map(Duration::from_secs)
    }

    fn template_dir(&self) -> Option<&Path> {
        self.templates.as_ref().and_then(|t| t.dir.as_deref())
    }

    fn slack_bot_token(&self) -> Option<&str> {
        self.slack.as_ref().map(|s| s.bot_token.as_str())
    }

    fn slack_channel(&self) -> Option<&str> {
        self.slack.as_ref().map(|s| s.channel.as_str())
    }

    fn slack_api_base(&self) -> &str {
        self.slack
            .as_ref()
            .and_then(|s| s.api_base.as_deref())
            .unwrap_or(DEFAULT_SLACK_API_BASE)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
