pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{ConsoleSink, MistClient, SlackSink};
pub use core::pipeline::{ReportKind, ReportPipeline, ReportRequest};
pub use core::render::TemplateRegistry;
pub use domain::alerts::{AlertRecord, SiteAlerts};
pub use domain::issues::MarvisIssues;
pub use domain::sites::SiteList;
pub use utils::error::{ReportError, Result};
