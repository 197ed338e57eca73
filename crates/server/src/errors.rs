use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use service::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// Failure body every API route answers with:
/// `{error, code, status, timestamp, details?}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self { status, code, message: message.into(), details: None }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Validation failures always list their violations; internal failures
    /// carry diagnostic text only outside production.
    pub fn from_service(err: ServiceError, production: bool) -> Self {
        let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = err.code();
        match err {
            ServiceError::Validation(failure) => {
                let details = json!(failure.violations);
                Self::new(status, code, "validation failed").with_details(details)
            }
            ServiceError::Internal(detail) => {
                error!(error = %detail, "internal error");
                let api = Self::new(status, code, "internal server error");
                if production { api } else { api.with_details(Value::String(detail)) }
            }
            other => Self::new(status, code, other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_client_error() {
            warn!(status = self.status.as_u16(), code = self.code, error = %self.message, "request rejected");
        }
        let mut body = json!({
            "error": self.message,
            "code": self.code,
            "status": self.status.as_u16(),
            "timestamp": Utc::now().to_rfc3339(),
        });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database unavailable: {0}")]
    Database(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::schema::ValidationFailure;

    #[test]
    fn internal_details_are_hidden_in_production() {
        let prod = ApiError::from_service(ServiceError::Internal("pool timed out".into()), true);
        assert_eq!(prod.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(prod.details.is_none());

        let dev = ApiError::from_service(ServiceError::Internal("pool timed out".into()), false);
        assert_eq!(dev.details, Some(Value::String("pool timed out".into())));
    }

    #[test]
    fn validation_lists_violations_everywhere() {
        let failure = ValidationFailure::single("price", "range", "must be positive");
        let api = ApiError::from_service(ServiceError::Validation(failure), true);
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.code, "VALIDATION_ERROR");
        let details = api.details.unwrap();
        assert_eq!(details[0]["field"], "price");
    }

    #[test]
    fn domain_kinds_keep_their_status() {
        let api = ApiError::from_service(ServiceError::Conflict("booking is not pending".into()), true);
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert_eq!(api.message, "booking is not pending");
    }
}
