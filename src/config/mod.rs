use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    #[default]
    Development,
    Production,
    Test,
}

impl AppEnv {
    pub fn is_production(self) -> bool {
        self == AppEnv::Production
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppEnv::Development => "development",
            AppEnv::Production => "production",
            AppEnv::Test => "test",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database_url: String,
    /// Replaces `database_url` when `app_env` is `test`.
    pub test_database_url: Option<String>,
    pub database_max_connections: u32,
    pub api_token: String,
    #[serde(default)]
    pub app_env: AppEnv,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub telemetry_enabled: bool,
    #[serde(default = "default_telemetry_service_name")]
    pub telemetry_service_name: String,
    #[serde(default = "default_telemetry_service_version")]
    pub telemetry_service_version: String,
    #[serde(default = "default_telemetry_otlp_endpoint")]
    pub telemetry_otlp_endpoint: String,
}

fn default_port() -> u16 {
    8000
}

fn default_telemetry_service_name() -> String {
    "bookmarks-api".to_string()
}

fn default_telemetry_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_telemetry_otlp_endpoint() -> String {
    "http://otel-collector.observability.svc.cluster.local:4317".to_string()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::default())
    }

    fn from_environment(source: Environment) -> Result<Self, ConfigError> {
        let mut config: Self = Config::builder()
            .set_default("database_max_connections", 5)?
            .add_source(source)
            .build()?
            .try_deserialize()?;

        if let (AppEnv::Test, Some(url)) = (config.app_env, config.test_database_url.take()) {
            config.database_url = url;
        }

        if config.database_url.is_empty() {
            return Err(ConfigError::NotFound("database_url".to_string()));
        }
        // an empty token would match the bare "Bearer " header
        if config.api_token.trim().is_empty() {
            return Err(ConfigError::Message("api_token must not be empty".to_string()));
        }

        Ok(config)
    }
}
