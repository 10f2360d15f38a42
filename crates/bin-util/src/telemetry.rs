//! Tracing initialization shared by the binaries.
use eyre::Context as _;
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};

/// Directives applied before anything from `RUST_LOG`
const DEFAULT_DIRECTIVES: &[&str] = &[
    "helius_rpc=info",
    "indexer_api=info",
    "indexing_config=info",
    "indexer_jobs=info",
    "webhook_receiver=info",
    "indexer_cli=info",
    "hyper=error",
    "reqwest=error",
    "sqlx=warn",
];

/// Install the global tracing subscriber.
///
/// Debug builds log human readable lines, release builds log JSON including the current span.
/// Directives from `RUST_LOG` are layered on top of the crate defaults.
///
/// # Errors
///
/// When `RUST_LOG` holds an invalid directive or a global subscriber is already set
pub fn init() -> eyre::Result<()> {
    let mut filter = EnvFilter::new(DEFAULT_DIRECTIVES.join(","));
    if let Ok(env) = std::env::var(EnvFilter::DEFAULT_ENV) {
        for directive in env.split(',').filter(|directive| !directive.trim().is_empty()) {
            filter = filter.add_directive(
                directive
                    .trim()
                    .parse()
                    .wrap_err_with(|| format!("invalid log directive {directive:?}"))?,
            );
        }
    }

    let output_layer = tracing_subscriber::fmt::layer()
        .with_line_number(true)
        .with_ansi(true)
        .with_file(true)
        .with_writer(std::io::stderr);

    // use json logging for release builds
    let subscriber = Registry::default().with(filter).with(ErrorLayer::default());
    let subscriber = if cfg!(debug_assertions) {
        subscriber.with(output_layer.boxed())
    } else {
        subscriber.with(output_layer.json().with_current_span(true).boxed())
    };

    subscriber
        .try_init()
        .wrap_err("could not install tracing subscriber")
}
