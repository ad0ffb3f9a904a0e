//! Observability infrastructure for curio.
//!
//! Structured logging with consistent spans across the indexing and release
//! resolution paths. Initialization is idempotent so library consumers and
//! test harnesses can both call it freely.

use std::sync::Once;
use tracing::Span;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Log output format.
#[derive(Debug, Clone, Copy, Default)]
pub enum LogFormat {
    /// JSON structured logs (for production).
    Json,
    /// Pretty-printed logs (for development).
    #[default]
    Pretty,
}

/// Initializes the logging subsystem.
///
/// Call once at application startup. Safe to call multiple times;
/// subsequent calls are no-ops.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Controls log levels (e.g., `info`, `curio_release=debug`)
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        match format {
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().json())
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().pretty())
                    .init();
            }
        }
    });
}

/// Creates a span for release-resolution operations.
#[must_use]
pub fn release_span(operation: &str, druid: &str) -> Span {
    tracing::info_span!("release", op = operation, druid = druid)
}

/// Creates a span for indexing operations.
#[must_use]
pub fn indexing_span(operation: &str, druid: &str) -> Span {
    tracing::info_span!("indexing", op = operation, druid = druid)
}
