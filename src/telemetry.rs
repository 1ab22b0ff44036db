use opentelemetry::trace::TracerProvider;
use opentelemetry::KeyValue;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::{trace as sdktrace, Resource};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{AppConfig, AppEnv};

pub struct TelemetryConfig {
    pub service_name: String,
    pub service_version: String,
    pub environment: AppEnv,
    pub otlp_endpoint: String,
}

impl From<&AppConfig> for TelemetryConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            service_name: config.telemetry_service_name.clone(),
            service_version: config.telemetry_service_version.clone(),
            environment: config.app_env,
            otlp_endpoint: config.telemetry_otlp_endpoint.clone(),
        }
    }
}

/// Installs the subscriber with an OTLP layer. The returned provider must be
/// shut down on exit so batched spans are flushed.
pub fn init_telemetry_with_subscriber(
    config: &TelemetryConfig,
    env_filter: EnvFilter,
) -> Result<sdktrace::SdkTracerProvider, Box<dyn std::error::Error>> {
    let resource = Resource::builder_empty()
        .with_attribute(KeyValue::new(SERVICE_NAME, config.service_name.clone()))
        .with_attribute(KeyValue::new(SERVICE_VERSION, config.service_version.clone()))
        .with_attribute(KeyValue::new(
            "deployment.environment.name",
            config.environment.as_str(),
        ))
        .build();

    let exporter = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&config.otlp_endpoint)
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build();

    let tracer = provider.tracer(config.service_name.clone());

    opentelemetry::global::set_tracer_provider(provider.clone());

    let otel_layer = OpenTelemetryLayer::new(tracer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json())
        .with(otel_layer)
        .try_init()?;

    tracing::info!(
        "OpenTelemetry initialized: service={}, endpoint={}",
        config.service_name,
        config.otlp_endpoint
    );

    Ok(provider)
}

/// JSON logs in production, human-readable logs everywhere else.
pub fn init_subscriber_without_telemetry(env_filter: EnvFilter, app_env: AppEnv) {
    let json = app_env.is_production();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_telemetry_hands_back_provider_for_shutdown() {
        let config = TelemetryConfig {
            service_name: "bookmarks-api".to_string(),
            service_version: "0.1.0".to_string(),
            environment: AppEnv::Test,
            otlp_endpoint: "http://127.0.0.1:4317".to_string(),
        };

        let provider = init_telemetry_with_subscriber(&config, EnvFilter::new("info")).unwrap();

        assert!(provider.shutdown().is_ok());
        assert!(provider.shutdown().is_err());
    }
}
