use crate::config::Config;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{runtime, trace as sdktrace, Resource};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "gradebook=debug,tower_http=debug,axum=debug";

/// Counter bumped once per document storage call, labelled by collection
/// and operation
pub const DOCUMENT_OPERATIONS: &str = "document_operations_total";

/// Flushes pending spans when dropped at the end of `main`
pub struct ObservabilityGuard;

impl Drop for ObservabilityGuard {
    fn drop(&mut self) {
        global::shutdown_tracer_provider();
    }
}

pub fn init(config: &Config) -> anyhow::Result<ObservabilityGuard> {
    init_tracing(config)?;
    init_metrics(config)?;
    Ok(ObservabilityGuard)
}

fn environment(config: &Config) -> &'static str {
    if config.production {
        "production"
    } else {
        "development"
    }
}

fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let otel_layer = match &config.otel_exporter_endpoint {
        Some(endpoint) => {
            let tracer = otlp_tracer(config, endpoint)?;
            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        }
        None => None,
    };

    Registry::default()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(otel_layer)
        .init();

    tracing::info!(
        "Tracing initialized for {} ({}), OTLP export {}",
        config.service_name,
        environment(config),
        config.otel_exporter_endpoint.as_deref().unwrap_or("disabled")
    );
    Ok(())
}

/// Batch OTLP exporter tagged with this deployment's identity
fn otlp_tracer(config: &Config, endpoint: &str) -> anyhow::Result<sdktrace::Tracer> {
    let resource = Resource::new(vec![
        KeyValue::new("service.name", config.service_name.clone()),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        KeyValue::new("deployment.environment", environment(config)),
    ]);

    let tracer = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .with_trace_config(sdktrace::config().with_resource(resource))
        .install_batch(runtime::Tokio)?;

    Ok(tracer)
}

fn init_metrics(config: &Config) -> anyhow::Result<()> {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], config.metrics_port))
        .add_global_label("service", config.service_name.clone())
        .add_global_label("environment", environment(config))
        .install()?;

    metrics::describe_counter!(
        DOCUMENT_OPERATIONS,
        "Storage calls per collection and operation"
    );

    tracing::info!("Prometheus metrics on port {}", config.metrics_port);
    Ok(())
}
