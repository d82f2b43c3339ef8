use crate::reconciliation::CascadeMode;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroUsize;

const DEFAULT_EXPORT_BATCH_SIZE: usize = 500;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub reconciliation: ReconciliationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let cascade = match env::var("RECON_CASCADE") {
            Ok(value) => CascadeMode::parse(&value).ok_or(ConfigError::InvalidCascade { value })?,
            Err(_) => CascadeMode::default(),
        };

        let export_batch_size = match env::var("RECON_EXPORT_BATCH_SIZE") {
            Ok(value) => value
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(NonZeroUsize::new)
                .ok_or(ConfigError::InvalidBatchSize)?,
            Err(_) => default_export_batch_size(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            reconciliation: ReconciliationConfig {
                cascade,
                export_batch_size,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Matcher precedence and export chunking.
#[derive(Debug, Clone)]
pub struct ReconciliationConfig {
    pub cascade: CascadeMode,
    pub export_batch_size: NonZeroUsize,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            cascade: CascadeMode::default(),
            export_batch_size: default_export_batch_size(),
        }
    }
}

fn default_export_batch_size() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_EXPORT_BATCH_SIZE).unwrap_or(NonZeroUsize::MIN)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidCascade { value: String },
    InvalidBatchSize,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCascade { value } => write!(
                f,
                "RECON_CASCADE must be 'legacy' or 'refined' (found '{}')",
                value
            ),
            ConfigError::InvalidBatchSize => {
                write!(f, "RECON_EXPORT_BATCH_SIZE must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidCascade { .. }
            | ConfigError::InvalidBatchSize => None,
        }
    }
}
