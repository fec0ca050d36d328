use crate::adapters::http::{DEFAULT_API_HOST, DEFAULT_SCHEME};
use crate::adapters::slack::DEFAULT_SLACK_API_BASE;
use crate::core::pipeline::{ReportKind, ReportRequest};
use crate::core::ConfigProvider;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_required_field, validate_scheme, Validate,
};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "mist-reporter")]
#[command(about = "Fetch a Juniper Mist report and post it to a chat channel")]
pub struct CliConfig {
    #[arg(long, env = "MIST_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    #[arg(long, env = "MIST_ORG_ID")]
    pub org_id: Option<String>,

    #[arg(long, env = "MIST_API_HOST", default_value = DEFAULT_API_HOST)]
    pub api_host: String,

    #[arg(long, default_value = DEFAULT_SCHEME)]
    pub scheme: String,

    #[arg(long, env = "MIST_TIMEOUT_SECONDS")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, default_value = "site_alerts", help = "site_alerts, list_of_sites or marvis_issues")]
    pub report: ReportKind,

    #[arg(long, help = "Site to search alerts for (site_alerts only)")]
    pub site_id: Option<String>,

    #[arg(long, help = "Directory with templates overriding the built-in ones")]
    pub template_dir: Option<PathBuf>,

    #[arg(long, env = "SLACK_BOT_TOKEN", hide_env_values = true)]
    pub slack_bot_token: Option<String>,

    #[arg(long, env = "SLACK_CHANNEL")]
    pub slack_channel: Option<String>,

    #[arg(long, default_value = DEFAULT_SLACK_API_BASE)]
    pub slack_api_base: String,

    #[arg(long, help = "TOML file with [mist], [slack] and [templates] settings")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Emit JSON log lines")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// The report selected on the command line, scoped by `--site-id` or the org id.
    pub fn report_request(&self, org_id: Option<&str>) -> Result<ReportRequest> {
        let scope = match self.report {
            ReportKind::SiteAlerts => validate_required_field("site_id", &self.site_id)?.clone(),
            ReportKind::ListOfSites | ReportKind::MarvisIssues => org_id
                .map(str::to_string)
                .ok_or_else(|| ReportError::MissingConfig {
                    field: "org_id".to_string(),
                })?,
        };
        validate_non_empty_string(self.report.scope_name(), &scope)?;
        Ok(ReportRequest::new(self.report, scope))
    }
}

impl ConfigProvider for CliConfig {
    fn api_scheme(&self) -> &str {
        &self.scheme
    }

    fn api_host(&self) -> &str {
        &self.api_host
    }

    fn api_token(&self) -> &str {
        self.api_token.as_deref().unwrap_or_default()
    }

    fn org_id(&self) -> Option<&str> {
        self.org_id.as_deref()
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    fn template_dir(&self) -> Option<&Path> {
        self.template_dir.as_deref()
    }

    fn slack_bot_token(&self) -> Option<&str> {
        self.slack_bot_token.as_deref()
    }

    fn slack_channel(&self) -> Option<&str> {
        self.slack_channel.as_deref()
    }

    fn slack_api_base(&self) -> &str {
        &self.slack_api_base
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let token = validate_required_field("api_token", &self.api_token)?;
        validate_non_empty_string("api_token", token)?;
        validate_non_empty_string("api_host", &self.api_host)?;
        validate_scheme("scheme", &self.scheme)?;

        if self.slack_bot_token.is_some() != self.slack_channel.is_some() {
            return Err(ReportError::ConfigValidation {
                field: "slack".to_string(),
                message: "slack_bot_token and slack_channel must be set together".to_string(),
            });
        }
        Ok(())
    }
}
