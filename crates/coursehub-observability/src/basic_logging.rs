use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::default_filter;

/// Initialize basic console logging when observability is disabled.
///
/// # Configuration
///
/// - **Log Level**: `LOG_LEVEL` environment variable (default: "info"),
///   overridden entirely by `RUST_LOG` when set
/// - **Format**: Compact with file and line numbers
pub fn init_basic_console_logging(app_crate: &str) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(app_crate, &log_level)));

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter);

    // try_init: tests and the CLI may have installed a subscriber already
    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
