//! Observability helpers for regmode.
//!
//! Structured logging via `tracing`, with one span per resource operation so
//! every poll tick and remote call is attributed to its project.

use std::sync::Once;

use tracing::Span;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::Operation;
use crate::identity::ProjectId;

static INIT: Once = Once::new();

/// Directives used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logs (for automation).
    Json,
    /// Pretty-printed multi-line logs.
    #[default]
    Pretty,
    /// Single-line logs without targets (for interactive CLIs).
    Compact,
}

/// Initializes the logging subsystem.
///
/// Logs go to stderr so stdout stays free for command output. `RUST_LOG`
/// overrides `default_filter`. Only the first call installs a subscriber, and
/// an already-installed global subscriber is left in place.
///
/// # Example
///
/// ```rust
/// use regmode_core::observability::{init_logging, LogFormat, DEFAULT_FILTER};
///
/// init_logging(LogFormat::Pretty, DEFAULT_FILTER);
/// ```
pub fn init_logging(format: LogFormat, default_filter: &str) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback_filter(default_filter));

        let registry = tracing_subscriber::registry().with(env_filter);
        let installed = match format {
            LogFormat::Json => registry
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init(),
            LogFormat::Pretty => registry
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init(),
            LogFormat::Compact => registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .try_init(),
        };
        if installed.is_err() {
            tracing::debug!("global subscriber already set, keeping it");
        }
    });
}

fn fallback_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Creates the span wrapping one resource operation.
///
/// # Example
///
/// ```rust
/// use regmode_core::error::Operation;
/// use regmode_core::identity::ProjectId;
/// use regmode_core::observability::resource_span;
///
/// let project = ProjectId::new("5f1a2b3c4d5e6f7a8b9c0d1e").unwrap();
/// let span = resource_span(Operation::Read, &project);
/// let _guard = span.enter();
/// ```
#[must_use]
pub fn resource_span(operation: Operation, project: &ProjectId) -> Span {
    tracing::info_span!(
        "regional_mode",
        op = %operation,
        project = %project,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use tracing::level_filters::LevelFilter;

    #[test]
    fn init_logging_is_idempotent() {
        init_logging(LogFormat::Compact, "warn,regmode_core=info");
        init_logging(LogFormat::Json, DEFAULT_FILTER);
    }

    #[test]
    fn fallback_filter_keeps_per_target_directives() {
        let filter = fallback_filter("warn,regmode_core=info");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn invalid_directives_fall_back_to_info() {
        let filter = fallback_filter("regmode_core=notalevel");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn resource_span_accepts_events() {
        let project = ProjectId::new("5f1a2b3c4d5e6f7a8b9c0d1e").unwrap();
        let span = resource_span(Operation::Update, &project);
        let _guard = span.enter();
        tracing::info!("update in progress");
    }
}
