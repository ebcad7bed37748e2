use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.counterapi.dev/v1";
pub const DEFAULT_NAMESPACE: &str = "anti-fraud-guide";
pub const DEFAULT_AGGREGATE_KEY: &str = "visits";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub counter: CounterConfig,
    pub visitor: VisitorConfig,
    pub logging: LoggingConfig,
    pub frontend: FrontendConfig,
    pub environment: Environment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterBackendKind {
    Http,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterConfig {
    pub backend: CounterBackendKind,
    pub api_base_url: String,
    pub namespace: String,
    pub aggregate_key: String,
    pub timeout_secs: u64,
}

impl CounterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            backend: CounterBackendKind::Http,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            aggregate_key: DEFAULT_AGGREGATE_KEY.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisitorConfig {
    /// Overrides the built-in digest salt. Changing it re-keys every visitor marker.
    pub salt: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Path to a built frontend directory served for unmatched paths
    pub static_dir: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8787".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid port number")?;

        let backend = match std::env::var("COUNTER_BACKEND")
            .unwrap_or_else(|_| "http".to_string())
            .to_lowercase()
            .as_str()
        {
            "http" => CounterBackendKind::Http,
            "memory" => CounterBackendKind::Memory,
            other => {
                tracing::warn!(
                    "Unknown COUNTER_BACKEND '{other}', falling back to 'http'. Supported values: http, memory"
                );
                CounterBackendKind::Http
            }
        };

        let api_base_url = std::env::var("COUNTER_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let namespace =
            std::env::var("COUNTER_NAMESPACE").unwrap_or_else(|_| DEFAULT_NAMESPACE.to_string());
        let aggregate_key = std::env::var("COUNTER_AGGREGATE_KEY")
            .unwrap_or_else(|_| DEFAULT_AGGREGATE_KEY.to_string());

        let timeout_secs = match std::env::var("COUNTER_TIMEOUT_SECS") {
            Ok(v) => v
                .parse::<u64>()
                .context("COUNTER_TIMEOUT_SECS must be a whole number of seconds")?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            bail!("COUNTER_TIMEOUT_SECS must be greater than zero");
        }

        let salt = std::env::var("VISITOR_SALT")
            .ok()
            .filter(|s| !s.is_empty());

        let environment = match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
            .as_str()
        {
            "development" | "dev" => Environment::Development,
            "production" | "prod" => Environment::Production,
            other => {
                tracing::warn!(
                    "Unknown APP_ENV '{other}', falling back to 'development'. Supported values: development, production"
                );
                Environment::Development
            }
        };

        let format = match std::env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "pretty".to_string())
            .to_lowercase()
            .as_str()
        {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                tracing::warn!(
                    "Unknown LOG_FORMAT '{other}', falling back to 'pretty'. Supported values: pretty, json"
                );
                LogFormat::Pretty
            }
        };

        let frontend_static_dir = std::env::var("FRONTEND_STATIC_DIR").ok();

        Ok(Config {
            server: ServerConfig { host, port },
            counter: CounterConfig {
                backend,
                api_base_url,
                namespace,
                aggregate_key,
                timeout_secs,
            },
            visitor: VisitorConfig { salt },
            logging: LoggingConfig { format },
            frontend: FrontendConfig {
                static_dir: frontend_static_dir,
            },
            environment,
        })
    }
}
