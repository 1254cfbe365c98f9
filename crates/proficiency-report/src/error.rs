use crate::config::ConfigError;
use crate::scale_colors::{ReconcileError, ScaleColorServiceError};
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Fixture(serde_json::Error),
    Reconcile(ReconcileError),
    ScaleColors(ScaleColorServiceError),
    Usage(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Fixture(err) => write!(f, "fixture error: {}", err),
            AppError::Reconcile(err) => write!(f, "reconcile error: {}", err),
            AppError::ScaleColors(err) => write!(f, "scale color error: {}", err),
            AppError::Usage(message) => write!(f, "usage error: {}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Fixture(err) => Some(err),
            AppError::Reconcile(err) => Some(err),
            AppError::ScaleColors(err) => Some(err),
            AppError::Usage(_) => None,
        }
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

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Fixture(value)
    }
}

impl From<ReconcileError> for AppError {
    fn from(value: ReconcileError) -> Self {
        Self::Reconcile(value)
    }
}

impl From<ScaleColorServiceError> for AppError {
    fn from(value: ScaleColorServiceError) -> Self {
        Self::ScaleColors(value)
    }
}
