use std::io;
use tracing_appender::rolling;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber: a console layer on stderr, so command
/// output on stdout stays machine-readable, and a daily rolling file layer.
/// `RUST_LOG` overrides the console filter.
pub fn configure_logging() {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,catalog=info,entity=info,llm_request=info"));

    let console_log = fmt::layer()
        .with_writer(io::stderr)
        .with_filter(console_filter);

    let file_appender = rolling::daily("logs", "icd-recommender.log");
    let file_log = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_filter(EnvFilter::new("info,scoring=debug,llm_request=debug"));

    tracing_subscriber::Registry::default()
        .with(console_log)
        .with(file_log)
        .init();
}
