use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins; otherwise this crate logs at `info`, or `debug` when verbose.
fn report_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "mist_reporter=debug,info"
    } else {
        "mist_reporter=info"
    }
}

/// Compact human-readable lines on stderr.
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(report_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

/// JSON lines for container log collectors.
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(report_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .json()
                .with_current_span(false),
        )
        .init();
}
