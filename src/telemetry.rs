use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::{LevelFilter, ParseError};
use tracing_subscriber::EnvFilter;

/// Targets that follow a bare `APP_LOG_LEVEL`; everything else stays at `warn`.
const OWN_TARGETS: [&str; 2] = ["torre_controle", "torre_controle_api"];

#[derive(Debug)]
pub enum TelemetryError {
    Filter {
        origin: &'static str,
        directives: String,
        source: ParseError,
    },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::Filter {
                origin, directives, ..
            } => write!(f, "{origin} holds an invalid log filter '{directives}'"),
            TelemetryError::Subscriber(err) => write!(f, "subscriber already installed: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::Filter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Installs the global subscriber. Logs go to stderr so that CLI reports
/// written to stdout stay machine-readable.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(std::env::var("RUST_LOG").ok(), &config.log_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

/// A non-blank `RUST_LOG` is taken verbatim. Otherwise the configured level
/// is used, and a bare level applies to this crate's targets only.
fn build_filter(rust_log: Option<String>, log_level: &str) -> Result<EnvFilter, TelemetryError> {
    let (origin, directives) = match rust_log.filter(|value| !value.trim().is_empty()) {
        Some(value) => ("RUST_LOG", value),
        None => ("APP_LOG_LEVEL", scoped_directives(log_level)),
    };

    EnvFilter::try_new(&directives).map_err(|source| TelemetryError::Filter {
        origin,
        directives,
        source,
    })
}

fn scoped_directives(log_level: &str) -> String {
    let level = log_level.trim();
    if level.parse::<LevelFilter>().is_err() {
        return level.to_string();
    }

    let mut directives = String::from("warn");
    for target in OWN_TARGETS {
        directives.push_str(&format!(",{target}={level}"));
    }
    directives
}
