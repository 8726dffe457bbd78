use resizer_core::LogFormat;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "resizer=info";

/// Initialize tracing for the process.
///
/// The filter comes from `RUST_LOG` when set. JSON output carries the current span
/// (bucket, key, derivative) on every event. Returns an error if a global
/// subscriber is already installed.
pub fn init_telemetry(
    service_name: &str,
    service_version: &str,
    format: LogFormat,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_target(false),
            )
            .try_init()?,
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()?,
    }

    tracing::info!(
        service = service_name,
        version = service_version,
        log_format = %format,
        "Tracing initialized"
    );
    Ok(())
}
