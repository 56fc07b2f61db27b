//! Typed request-handling errors for the Harbormaster server.
//!
//! Every handler returns `Result<HttpResponse, ApiError>`; the
//! `ResponseError` impl turns each error kind into its HTTP status while
//! keeping a uniform `{message}` JSON envelope. Storage causes are logged
//! rather than leaked to clients.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Error response payload shared by every endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub message: String,
}

/// Failure kinds a request can produce.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is missing, blank, or malformed.
    #[error("{0}")]
    Validation(String),

    /// A unique vessel or equipment code already exists.
    #[error("{0}")]
    Conflict(String),

    /// An aggregate was requested over no data.
    #[error("{0}")]
    NotFound(String),

    /// Connection pool or database failure; cause stays in the logs.
    #[error("internal storage error")]
    Storage(String),
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};
        match err {
            // Duplicate codes that race past the handler pre-check still
            // surface as conflicts here.
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                ApiError::Conflict(info.message().to_string())
            }
            Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                ApiError::Validation(format!("unknown reference: {}", info.message()))
            }
            other => ApiError::Storage(other.to_string()),
        }
    }
}

impl From<diesel::r2d2::PoolError> for ApiError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        ApiError::Storage(format!("connection pool: {err}"))
    }
}

impl From<actix_web::error::BlockingError> for ApiError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        ApiError::Storage(format!("blocking task: {err}"))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Storage(cause) = self {
            log::error!("storage failure: {cause}");
        }
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            message: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;
    use diesel::result::{DatabaseErrorKind, Error};

    #[test]
    fn unique_violation_maps_to_conflict() {
        let err: ApiError = Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value".to_string()),
        )
        .into();
        match &err {
            ApiError::Conflict(message) => assert_eq!(message, "duplicate key value"),
            other => panic!("expected Conflict, got {other:?}"),
        }
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn foreign_key_violation_maps_to_validation() {
        let err: ApiError = Error::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new("violates foreign key".to_string()),
        )
        .into();
        match &err {
            ApiError::Validation(message) => {
                assert!(message.contains("unknown reference"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn other_database_errors_map_to_storage() {
        let err: ApiError = Error::NotFound.into();
        match &err {
            ApiError::Storage(_) => {}
            other => panic!("expected Storage, got {other:?}"),
        }
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn storage_display_hides_cause() {
        let err = ApiError::Storage("password=hunter2".to_string());
        assert_eq!(format!("{err}"), "internal storage error");
    }
}
