//! Tracing subscriber setup.

use super::exporter;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Trace file name inside the data directory.
const TRACE_FILE: &str = "filter-sheet-otlp.json";

/// Installs a global subscriber exporting spans to a rotating OTLP file.
///
/// The filter comes from `config.trace_level`, defaulting to `"info"`. Spans
/// go to `<data_dir>/filter-sheet-otlp.json`. If the directory cannot be
/// created, tracing stays off. Calling this more than once is harmless: only
/// the first subscriber is installed.
///
/// # Example
///
/// ```rust
/// use filter_sheet::observability::init_tracing;
/// use filter_sheet::Config;
///
/// let dir = tempfile::tempdir()?;
/// init_tracing(&Config {
///     data_dir: dir.path().to_path_buf(),
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// });
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn init_tracing(config: &Config) {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| "info".to_string());

    if std::fs::create_dir_all(&config.data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new(
        "service.name",
        "filter-sheet",
    )]);

    let provider = exporter::file_tracer_provider(config.data_dir.join(TRACE_FILE), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer("filter-sheet"));

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(otel_layer)
        .try_init();
}
