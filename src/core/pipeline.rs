use crate::core::render::{
    TemplateRegistry, LIST_OF_SITES_TEMPLATE, MARVIS_ISSUES_TEMPLATE, SITE_ALERTS_TEMPLATE,
};
use crate::core::Transport;
use crate::domain::alerts::SiteAlerts;
use crate::domain::issues::MarvisIssues;
use crate::domain::sites::SiteList;
use crate::utils::error::Result;
use crate::utils::validation::validate_non_empty_string;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Alerts are searched over the trailing six hours.
pub const ALERT_WINDOW_SECS: i64 = 21_600;
pub const ALERT_SEARCH_LIMIT: u32 = 100;
pub const ALERT_SEVERITIES: &str = "critical,warn,info";
pub const SUGGESTIONS_QUERY: &str =
    "query=group_by_category_symptom&display_priority=high&active=true";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    SiteAlerts,
    ListOfSites,
    MarvisIssues,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [
        ReportKind::SiteAlerts,
        ReportKind::ListOfSites,
        ReportKind::MarvisIssues,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::SiteAlerts => "site_alerts",
            ReportKind::ListOfSites => "list_of_sites",
            ReportKind::MarvisIssues => "marvis_issues",
        }
    }

    pub fn template_name(&self) -> &'static str {
        match self {
            ReportKind::SiteAlerts => SITE_ALERTS_TEMPLATE,
            ReportKind::ListOfSites => LIST_OF_SITES_TEMPLATE,
            ReportKind::MarvisIssues => MARVIS_ISSUES_TEMPLATE,
        }
    }

    /// Site alerts are scoped to a site; the other reports to an organization.
    pub fn scope_name(&self) -> &'static str {
        match self {
            ReportKind::SiteAlerts => "site_id",
            ReportKind::ListOfSites | ReportKind::MarvisIssues => "org_id",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown report kind `{0}` (expected site_alerts, list_of_sites or marvis_issues)")]
pub struct ParseReportKindError(String);

impl FromStr for ReportKind {
    type Err = ParseReportKindError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ParseReportKindError(s.to_string()))
    }
}

/// `(start, end)` epoch seconds of the alert search window ending at `now`.
pub fn alert_window(now: i64) -> (i64, i64) {
    (now - ALERT_WINDOW_SECS, now)
}

/// One report asked for by a user: the kind plus the site or org it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub kind: ReportKind,
    pub scope_id: String,
}

impl ReportRequest {
    pub fn new(kind: ReportKind, scope_id: impl Into<String>) -> Self {
        Self {
            kind,
            scope_id: scope_id.into(),
        }
    }

    pub fn site_alerts(site_id: impl Into<String>) -> Self {
        Self::new(ReportKind::SiteAlerts, site_id)
    }

    pub fn list_of_sites(org_id: impl Into<String>) -> Self {
        Self::new(ReportKind::ListOfSites, org_id)
    }

    pub fn marvis_issues(org_id: impl Into<String>) -> Self {
        Self::new(ReportKind::MarvisIssues, org_id)
    }

    /// API path for this request, with the alert window ending at `now`.
    pub fn path(&self, now: i64) -> String {
        let id = self.scope_id.trim();
        match self.kind {
            ReportKind::SiteAlerts => {
                let (start, end) = alert_window(now);
                format!(
                    "/sites/{}/alarms/search?limit={}&start={}&end={}&severity={}",
                    id, ALERT_SEARCH_LIMIT, start, end, ALERT_SEVERITIES
                )
            }
            ReportKind::ListOfSites => format!("/orgs/{}/sites", id),
            ReportKind::MarvisIssues => {
                format!("/labs/orgs/{}/suggestions?{}", id, SUGGESTIONS_QUERY)
            }
        }
    }
}

/// Validated model handed to a template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportData {
    Alerts(SiteAlerts),
    Sites(SiteList),
    Issues(MarvisIssues),
}

impl ReportData {
    pub fn decode(kind: ReportKind, payload: &Value) -> Result<Self> {
        let data = match kind {
            ReportKind::SiteAlerts => ReportData::Alerts(SiteAlerts::from_value(payload)?),
            ReportKind::ListOfSites => ReportData::Sites(SiteList::from_value(payload)?),
            ReportKind::MarvisIssues => ReportData::Issues(MarvisIssues::from_response(payload)?),
        };
        Ok(data)
    }
}

/// Fetch, validate, aggregate and render one report.
pub struct ReportPipeline<T: Transport> {
    transport: T,
    templates: TemplateRegistry,
}

impl<T: Transport> ReportPipeline<T> {
    pub fn new(transport: T, templates: TemplateRegistry) -> Self {
        Self {
            transport,
            templates,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    pub async fn fetch(&self, path: &str, kind: ReportKind) -> Result<ReportData> {
        let payload = self.transport.get(path).await?;
        let data = ReportData::decode(kind, &payload)?;
        tracing::debug!("Decoded {} payload from {}", kind, path);
        Ok(data)
    }

    pub async fn run(&self, path: &str, template_name: &str, kind: ReportKind) -> Result<String> {
        tracing::info!("Running {} report", kind);
        let data = self.fetch(path, kind).await?;
        let message = self.templates.render(template_name, &data)?;
        tracing::info!("Rendered {} report ({} bytes)", kind, message.len());
        Ok(message)
    }

    pub async fn run_request(&self, request: &ReportRequest) -> Result<String> {
        self.run_request_at(request, chrono::Utc::now().timestamp())
            .await
    }

    pub async fn run_request_at(&self, request: &ReportRequest, now: i64) -> Result<String> {
        validate_non_empty_string(request.kind.scope_name(), &request.scope_id)?;
        self.run(&request.path(now), request.kind.template_name(), request.kind)
            .await
    }
}
