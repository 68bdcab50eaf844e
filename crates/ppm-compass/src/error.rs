use crate::comparison::{CatalogImportError, SessionError};
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Errors surfaced at the application boundary (CLI and HTTP service).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server error: {0}")]
    Server(#[from] axum::Error),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogImportError),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Catalog(_)
            | AppError::Session(_)
            | AppError::InvalidArgument(_)
            | AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::CriterionId;

    #[test]
    fn session_errors_map_to_bad_request() {
        let err = AppError::from(SessionError::UnknownCriterion(CriterionId::from("x")));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "session error: unknown criterion 'x'");
    }

    #[test]
    fn config_errors_map_to_internal_error() {
        let err = AppError::from(ConfigError::InvalidPort);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
