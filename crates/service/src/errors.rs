use models::errors::ModelError;
use models::schema::ValidationFailure;
use thiserror::Error;

/// The one failure taxonomy shared by every domain service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(ValidationFailure),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn invalid(field: &str, code: &str, message: impl Into<String>) -> Self {
        Self::Validation(ValidationFailure::single(field, code, message))
    }

    /// Stable machine-readable code for clients and logs.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "VALIDATION_ERROR",
            ServiceError::Unauthorized(_) => "UNAUTHORIZED",
            ServiceError::Forbidden(_) => "FORBIDDEN",
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::Conflict(_) => "CONFLICT",
            ServiceError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status the error maps to.
    pub fn status(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 400,
            ServiceError::Unauthorized(_) => 401,
            ServiceError::Forbidden(_) => 403,
            ServiceError::NotFound(_) => 404,
            ServiceError::Conflict(_) => 409,
            ServiceError::Internal(_) => 500,
        }
    }
}

impl From<ValidationFailure> for ServiceError {
    fn from(failure: ValidationFailure) -> Self { ServiceError::Validation(failure) }
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Duplicate(detail) => ServiceError::Conflict(format!("already exists: {detail}")),
            ModelError::MissingReference(detail) => ServiceError::NotFound(format!("referenced record not found: {detail}")),
            ModelError::Validation(detail) | ModelError::Db(detail) => ServiceError::Internal(detail),
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(err: sea_orm::DbErr) -> Self { ModelError::from(err).into() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_domain_kinds() {
        let dup: ServiceError = ModelError::Duplicate("users_email_key".into()).into();
        assert_eq!(dup.code(), "CONFLICT");
        assert_eq!(dup.status(), 409);

        let fk: ServiceError = ModelError::MissingReference("bookings_service_id_fkey".into()).into();
        assert_eq!(fk.status(), 404);

        let db: ServiceError = ModelError::Db("connection reset".into()).into();
        assert_eq!(db.code(), "INTERNAL_ERROR");
    }
}
