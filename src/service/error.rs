use thiserror::Error;

use crate::error::HttpError;
use axum::http::StatusCode;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("No eligible users found for reference code {0}")]
    NoEligibleUsers(String),

    #[error("Reference code {0} not found")]
    ReferenceNotFound(String),

    #[error("Referrer user {0} not found")]
    ReferrerNotFound(uuid::Uuid),

    #[error("Base amount is not configured")]
    BaseAmountMissing,

    #[error("A receipt file is required for settlement")]
    ReceiptRequired,

    #[error("Receipt upload failed: {0}")]
    Upload(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<crate::service::storage::UploadError> for ServiceError {
    fn from(err: crate::service::storage::UploadError) -> Self {
        ServiceError::Upload(err.to_string())
    }
}

impl ServiceError {
    /// Stable machine codes surfaced to API clients alongside the message.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NoEligibleUsers(_) => "NO_ELIGIBLE_USERS",
            ServiceError::ReferenceNotFound(_) => "REFERENCE_NOT_FOUND",
            ServiceError::ReferrerNotFound(_) => "REFERRER_NOT_FOUND",
            ServiceError::BaseAmountMissing => "BASE_AMOUNT_MISSING",
            ServiceError::ReceiptRequired => "RECEIPT_REQUIRED",
            ServiceError::Upload(_) => "UPLOAD_FAILED",
            ServiceError::Database(_) => "STORAGE_ERROR",
            ServiceError::Validation(_) => "VALIDATION_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::ReferenceNotFound(_) | ServiceError::ReferrerNotFound(_) => {
                StatusCode::NOT_FOUND
            }

            ServiceError::NoEligibleUsers(_)
            | ServiceError::ReceiptRequired
            | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            ServiceError::BaseAmountMissing => StatusCode::PRECONDITION_FAILED,

            ServiceError::Upload(_) => StatusCode::BAD_GATEWAY,

            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let code = error.error_code();
        let status = error.status_code();

        // Storage error internals stay in the logs; clients get a generic line.
        let message = match &error {
            ServiceError::Database(e) => {
                tracing::error!("settlement storage failure: {}", e);
                "An internal error occurred while processing the settlement".to_string()
            }
            ServiceError::Upload(e) => {
                tracing::error!("receipt upload failure: {}", e);
                "Receipt upload failed, settlement was not started".to_string()
            }
            other => other.to_string(),
        };

        HttpError::new(message, status).with_code(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(
            ServiceError::NoEligibleUsers("SL002".into()).error_code(),
            "NO_ELIGIBLE_USERS"
        );
        assert_eq!(
            ServiceError::ReferenceNotFound("SL002".into()).error_code(),
            "REFERENCE_NOT_FOUND"
        );
        assert_eq!(
            ServiceError::ReferrerNotFound(uuid::Uuid::nil()).error_code(),
            "REFERRER_NOT_FOUND"
        );
        assert_eq!(ServiceError::BaseAmountMissing.error_code(), "BASE_AMOUNT_MISSING");
        assert_eq!(ServiceError::ReceiptRequired.error_code(), "RECEIPT_REQUIRED");
    }

    #[test]
    fn precondition_errors_map_to_client_statuses() {
        let err: HttpError = ServiceError::NoEligibleUsers("SL002".into()).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code, Some("NO_ELIGIBLE_USERS"));

        let err: HttpError = ServiceError::ReferenceNotFound("SL002".into()).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn database_error_text_is_not_leaked() {
        let err: HttpError = ServiceError::Database(sqlx::Error::RowNotFound).into();
        assert!(!err.message.contains("no rows returned"));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
