//! Tracing and OpenTelemetry setup for the catalogctl CLI
//!
//! Usage:
//!   catalogctl --debug ...                 # Debug logging
//!   catalogctl --otel ...                  # Export traces to OTLP endpoint (telemetry feature)
//!   RUST_LOG=catalogctl_search=debug ...   # Fine-grained log control
//!
//! Environment variables:
//!   RUST_LOG                          # Log filter (default: warn, debug with --debug)
//!   OTEL_EXPORTER_OTLP_ENDPOINT       # OTLP endpoint (default: http://localhost:4317)
//!   OTEL_SERVICE_NAME                 # Service name (default: catalogctl)
//!
//! Catalog commands log to stderr so stdout stays pipeable. The navigation
//! shell owns the terminal, so it logs to ~/.catalogctl/logs/nav.log instead.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing::Subscriber;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Where formatted log lines are written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogTarget {
    #[default]
    Stderr,
    /// Appended to this file (parent directories are created)
    File(PathBuf),
}

impl LogTarget {
    /// Log file used while the navigation shell is on screen
    pub fn nav_log() -> Self {
        let dir = catalogctl_core::config::config_dir()
            .map(|d| d.join("logs"))
            .unwrap_or_else(std::env::temp_dir);
        LogTarget::File(dir.join("nav.log"))
    }
}

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets the filter to debug if RUST_LOG is unset)
    pub debug: bool,
    /// Enable OpenTelemetry OTLP export
    pub otel: bool,
    pub target: LogTarget,
}

fn env_filter(config: &TracingConfig) -> EnvFilter {
    let fallback = if config.debug { "debug" } else { "warn" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

/// Compact fmt layer writing to the configured target
fn fmt_layer<S>(config: &TracingConfig) -> Result<Box<dyn Layer<S> + Send + Sync>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = match &config.target {
        LogTarget::Stderr => tracing_subscriber::fmt::layer()
            .with_target(config.debug)
            .with_writer(std::io::stderr)
            .compact()
            .boxed(),
        LogTarget::File(path) => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(Mutex::new(open_log_file(path)?))
            .compact()
            .boxed(),
    };
    Ok(layer)
}

/// Initialize tracing based on configuration
pub fn init(config: &TracingConfig) -> Result<()> {
    let registry = tracing_subscriber::registry()
        .with(env_filter(config))
        .with(fmt_layer(config)?);

    #[cfg(feature = "telemetry")]
    if config.otel {
        let (layer, endpoint, service) = otel_layer()?;
        registry.with(layer).try_init().map_err(|err| anyhow!(err))?;
        tracing::info!(endpoint = %endpoint, service = %service, "OpenTelemetry tracing initialized");
        return Ok(());
    }

    registry.try_init().map_err(|err| anyhow!(err))?;
    if config.otel {
        tracing::warn!("--otel requested but catalogctl was built without the telemetry feature");
    }
    Ok(())
}

/// OTLP span exporter wrapped as a tracing layer; returns the endpoint and service name for logging
#[cfg(feature = "telemetry")]
fn otel_layer<S>() -> Result<(
    tracing_opentelemetry::OpenTelemetryLayer<S, opentelemetry_sdk::trace::Tracer>,
    String,
    String,
)>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::TracerProvider;

    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:4317".to_string());
    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "catalogctl".to_string());

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build()
        .map_err(|e| anyhow!("Failed to create OTLP exporter: {}", e))?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_resource(opentelemetry_sdk::Resource::new(vec![KeyValue::new(
            "service.name",
            service_name.clone(),
        )]))
        .build();

    let tracer = provider.tracer("catalogctl");
    // Dropping the provider would stop export
    let _ = opentelemetry::global::set_tracer_provider(provider);

    Ok((
        tracing_opentelemetry::layer().with_tracer(tracer),
        endpoint,
        service_name,
    ))
}

/// Shutdown OpenTelemetry (flush pending spans)
#[cfg(feature = "telemetry")]
pub fn shutdown_otel() {
    opentelemetry::global::shutdown_tracer_provider();
}

/// No-op shutdown when telemetry is disabled
#[cfg(not(feature = "telemetry"))]
pub fn shutdown_otel() {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_nav_log_is_a_file() {
        match LogTarget::nav_log() {
            LogTarget::File(path) => assert!(path.ends_with("nav.log")),
            LogTarget::Stderr => panic!("navigation shell must not log to stderr"),
        }
    }

    #[test]
    fn test_file_target_writes_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("nav.log");
        let config = TracingConfig {
            target: LogTarget::File(path.clone()),
            ..Default::default()
        };

        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("info"))
            .with(fmt_layer(&config).unwrap());
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(route = "/dashboard", "navigated");
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("navigated"));
        assert!(contents.contains("/dashboard"));
    }
}
