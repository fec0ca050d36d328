//! Named report templates rendered with minijinja.
//!
//! A [`TemplateRegistry`] is built once at startup and injected into the
//! pipeline; it is read-only afterwards and safe to share between requests.

use crate::utils::error::TemplateError;
use minijinja::{context, Environment, Error, ErrorKind, UndefinedBehavior};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const SITE_ALERTS_TEMPLATE: &str = "site_alerts.j2";
pub const LIST_OF_SITES_TEMPLATE: &str = "list_of_sites.j2";
pub const MARVIS_ISSUES_TEMPLATE: &str = "marvis_issues.j2";

const BUILTIN_TEMPLATES: [(&str, &str); 3] = [
    (
        SITE_ALERTS_TEMPLATE,
        include_str!("../../templates/site_alerts.j2"),
    ),
    (
        LIST_OF_SITES_TEMPLATE,
        include_str!("../../templates/list_of_sites.j2"),
    ),
    (
        MARVIS_ISSUES_TEMPLATE,
        include_str!("../../templates/marvis_issues.j2"),
    ),
];

fn builtin_source(name: &str) -> Option<&'static str> {
    BUILTIN_TEMPLATES
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .map(|(_, source)| *source)
}

pub struct TemplateRegistry {
    env: Environment<'static>,
}

impl TemplateRegistry {
    /// Registry without any templates; fill it with [`TemplateRegistry::add_template`].
    pub fn empty() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        // Attribute chains through absent groups render empty instead of failing.
        env.set_undefined_behavior(UndefinedBehavior::Chainable);
        env.add_filter("epoch", format_epoch);
        Self { env }
    }

    /// The templates compiled into the binary.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.env.set_loader(|name| Ok(builtin_source(name).map(str::to_string)));
        registry
    }

    /// Templates read from `dir`; names missing there fall back to the built-ins.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let mut registry = Self::empty();
        registry.env.set_loader(move |name| load_from_dir(&dir, name));
        registry
    }

    pub fn add_template(&mut self, name: &str, source: &str) -> Result<(), TemplateError> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())
            .map_err(|source| TemplateError::Load {
                name: name.to_string(),
                source,
            })
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, TemplateError> {
        let template = self.env.get_template(name).map_err(|source| {
            if source.kind() == ErrorKind::TemplateNotFound {
                TemplateError::Unknown {
                    name: name.to_string(),
                }
            } else {
                TemplateError::Load {
                    name: name.to_string(),
                    source,
                }
            }
        })?;

        template
            .render(context! { data => data })
            .map_err(|source| TemplateError::Render {
                name: name.to_string(),
                source,
            })
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn load_from_dir(dir: &Path, name: &str) -> Result<Option<String>, Error> {
    if name.contains("..") || Path::new(name).is_absolute() {
        return Ok(None);
    }

    let path = dir.join(name);
    match std::fs::read_to_string(&path) {
        Ok(source) => {
            tracing::debug!("Loaded template {} from {}", name, path.display());
            Ok(Some(source))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Ok(builtin_source(name).map(str::to_string))
        }
        Err(e) => Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("could not read {}", path.display()),
        )
        .with_source(e)),
    }
}

/// `{{ ts | epoch }}`: epoch seconds as a UTC timestamp.
fn format_epoch(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ts.to_string())
}
