use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::{LogFormat, ObservabilityConfig};

/// Initialize structured logging to stderr.
/// `RUST_LOG` wins over the configured level when set.
pub fn init_telemetry(settings: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(filter);
    match settings.log_format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
    }

    tracing::debug!(format = ?settings.log_format, "Telemetry initialized");
    Ok(())
}

/// Generate a correlation ID for linking related operations
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span covering one submission of a wizard session
pub fn create_submission_span(session_id: Uuid, member_count: Option<u32>) -> tracing::Span {
    tracing::info_span!(
        "transfer_submission",
        session.id = %session_id,
        member_count = member_count,
        correlation.id = %generate_correlation_id(),
    )
}

/// Span covering a whole CLI command
pub fn create_command_span(command: &str, variant: &str) -> tracing::Span {
    tracing::info_span!(
        "wizard_command",
        command = command,
        variant = variant,
        correlation.id = %generate_correlation_id(),
    )
}
