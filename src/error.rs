use crate::config::ConfigError;
use crate::reconciliation::{ImportError, RosterError, ServiceError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Serialization(serde_json::Error),
    Reconciliation(ServiceError),
    /// Well-formed request that cannot be acted on.
    Validation(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Serialization(err) => write!(f, "serialization error: {}", err),
            AppError::Reconciliation(err) => write!(f, "reconciliation error: {}", err),
            AppError::Validation(reason) => write!(f, "invalid request: {}", reason),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Serialization(err) => Some(err),
            AppError::Reconciliation(err) => Some(err),
            AppError::Validation(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Reconciliation(ServiceError::Import(_)) => StatusCode::BAD_REQUEST,
            AppError::Reconciliation(ServiceError::Roster(RosterError::Empty))
            | AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Reconciliation(ServiceError::Roster(RosterError::Unavailable(_)))
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

impl From<ServiceError> for AppError {
    fn from(value: ServiceError) -> Self {
        Self::Reconciliation(value)
    }
}

impl From<ImportError> for AppError {
    fn from(value: ImportError) -> Self {
        Self::Reconciliation(ServiceError::Import(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_errors_map_to_bad_request() {
        let error = AppError::from(ImportError::MissingColumn {
            dataset: "orders",
            field: "hub",
        });
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn empty_roster_maps_to_unprocessable() {
        let error = AppError::from(ServiceError::Roster(RosterError::Empty));
        assert!(error.to_string().contains("no entries"));
        assert_eq!(
            error.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn validation_errors_map_to_unprocessable() {
        let error = AppError::Validation("batch_size must be greater than zero".to_string());
        assert_eq!(error.to_string(), "invalid request: batch_size must be greater than zero");
        assert_eq!(
            error.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn unavailable_roster_is_internal() {
        let error = AppError::from(ServiceError::Roster(RosterError::Unavailable(
            "backend offline".to_string(),
        )));
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn config_errors_are_internal() {
        let error = AppError::from(ConfigError::InvalidPort);
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
