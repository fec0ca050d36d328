use clap::Parser;
use mist_reporter::core::delivery::publish;
use mist_reporter::core::{ConfigProvider, MessageSink};
use mist_reporter::utils::error::{ErrorCategory, ReportError};
use mist_reporter::utils::{logger, validation::Validate};
use mist_reporter::{
    CliConfig, ConsoleSink, MistClient, ReportPipeline, SlackSink, TemplateRegistry, TomlConfig,
};

fn exit_code(category: ErrorCategory) -> i32 {
    match category {
        ErrorCategory::Configuration => 1,
        ErrorCategory::Network => 2,
        ErrorCategory::Data => 3,
        ErrorCategory::Delivery => 4,
    }
}

fn fail(e: &ReportError) -> ! {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(exit_code(e.category()));
}

fn load_provider(cli: &CliConfig) -> mist_reporter::Result<Box<dyn ConfigProvider>> {
    match &cli.config {
        Some(path) => {
            tracing::debug!("Loading configuration from {}", path.display());
            let config = TomlConfig::from_file(path)?;
            config.validate()?;
            Ok(Box::new(config))
        }
        None => {
            cli.validate()?;
            Ok(Box::new(cli.clone()))
        }
    }
}

fn build_sink(config: &dyn ConfigProvider) -> Box<dyn MessageSink> {
    match (config.slack_bot_token(), config.slack_channel()) {
        (Some(token), Some(channel)) => {
            tracing::info!("Posting reports to Slack channel {}", channel);
            Box::new(SlackSink::new(config.slack_api_base(), token, channel))
        }
        _ => Box::new(ConsoleSink),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting mist-reporter");
    if cli.verbose {
        tracing::debug!("Requested report: {}", cli.report);
    }

    let provider = load_provider(&cli).unwrap_or_else(|e| fail(&e));
    let request = cli
        .report_request(provider.org_id())
        .unwrap_or_else(|e| fail(&e));

    let client = MistClient::from_config(provider.as_ref()).unwrap_or_else(|e| fail(&e));
    let templates = match provider.template_dir() {
        Some(dir) => TemplateRegistry::from_dir(dir),
        None => TemplateRegistry::builtin(),
    };
    let pipeline = ReportPipeline::new(client, templates);
    let sink = build_sink(provider.as_ref());

    let outcome = pipeline.run_request(&request).await;
    if let Err(e) = publish(sink.as_ref(), &outcome).await {
        fail(&e);
    }

    match outcome {
        Ok(_) => {
            tracing::info!("✅ {} report delivered", request.kind);
            Ok(())
        }
        Err(e) => fail(&e),
    }
}
