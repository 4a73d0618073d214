//! Coursehub Observability
//!
//! Provides configurable observability features including:
//! - Structured logging to console and daily-rolling files
//! - Distributed tracing via OpenTelemetry
//! - Prometheus metrics, including access-decision counters
//!
//! Compiled in with the `observability` feature (default). At runtime it can
//! be switched off with `OBSERVABILITY_ENABLED=false`, which leaves plain
//! console logging.
//!
//! # Examples
//!
//! ```no_run
//! use coursehub_observability::{init_tracing, shutdown_tracer};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing("coursehub");
//!     // ... application code ...
//!     shutdown_tracer().await;
//! }
//! ```

use std::sync::OnceLock;

pub mod basic_logging;
#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

pub use basic_logging::init_basic_console_logging;

#[cfg(feature = "observability")]
pub use metrics_exporter_prometheus::PrometheusHandle;

#[cfg(feature = "observability")]
pub use logging::{init_tracing, logging_middleware, shutdown_tracer};
#[cfg(feature = "observability")]
pub use metrics::{
    init_metrics, metrics_app, metrics_middleware, track_access_decision, track_course_created,
    track_jwt_issued, track_login_failure, track_login_success, track_media_uploaded,
    track_user_signup,
};

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Check if observability is enabled via the `OBSERVABILITY_ENABLED` env var.
/// Always false when the feature is not compiled in.
pub fn is_observability_enabled() -> bool {
    cfg!(feature = "observability")
        && *OBSERVABILITY_ENABLED
            .get_or_init(|| parse_enabled(std::env::var("OBSERVABILITY_ENABLED").ok().as_deref()))
}

fn parse_enabled(value: Option<&str>) -> bool {
    match value {
        Some(v) => {
            let v = v.trim().to_lowercase();
            v != "false" && v != "0" && v != "off"
        }
        None => true,
    }
}

/// Default `EnvFilter` directives: the app and workspace crates at `level`,
/// noisy dependencies at warn.
pub fn default_filter(app_crate: &str, level: &str) -> String {
    format!(
        "{app_crate}={level},coursehub_auth={level},coursehub_db={level},tower_http=warn,hyper=warn,tonic=warn,h2=warn,sqlx=warn"
    )
}

// No-op stubs when observability is disabled
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{extract::Request, middleware::Next, response::Response};

    /// Falls back to console logging when the feature is disabled
    pub fn init_tracing(app_crate: &str) {
        super::init_basic_console_logging(app_crate);
    }

    pub async fn shutdown_tracer() {}

    pub async fn logging_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    // No-op tracking functions
    pub fn track_user_signup() {}
    pub fn track_login_success() {}
    pub fn track_login_failure(_reason: &str) {}
    pub fn track_jwt_issued() {}
    pub fn track_access_decision(_rule: &str) {}
    pub fn track_course_created() {}
    pub fn track_media_uploaded(_kind: &str) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
