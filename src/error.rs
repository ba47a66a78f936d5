use actix_web::http::{header, StatusCode};
use actix_web::{error, HttpResponse};
use thiserror::Error;

use crate::auth::AuthError;
use crate::core::{MonthError, SelectionError};
use crate::models::ErrorResponse;
use crate::services::{ChartError, CrimeApiError, StoreError};

/// Error surfaced to HTTP clients
///
/// Every handler returns this; it renders as a JSON [`ErrorResponse`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("authentication required")]
    Unauthorized,

    #[error("admin role required")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("crime data service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("crime data service returned a malformed payload: {0}")]
    MalformedUpstream(String),

    #[error("charting service unavailable: {0}")]
    ChartingUnavailable(String),

    #[error("charting service failed: {0}")]
    ChartingFailed(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_failed",
            ApiError::Unauthorized => "unauthorized",
            ApiError::Forbidden => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::UpstreamUnavailable(_) => "upstream_unavailable",
            ApiError::MalformedUpstream(_) => "upstream_malformed",
            ApiError::ChartingUnavailable(_) => "charting_unavailable",
            ApiError::ChartingFailed(_) => "charting_failed",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UpstreamUnavailable(_)
            | ApiError::MalformedUpstream(_)
            | ApiError::ChartingFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::ChartingUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let mut builder = HttpResponse::build(status);

        if matches!(self, ApiError::Unauthorized) {
            builder.insert_header((header::WWW_AUTHENTICATE, r#"Basic realm="crime-stats""#));
        }

        builder.json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

impl From<CrimeApiError> for ApiError {
    fn from(err: CrimeApiError) -> Self {
        match err {
            CrimeApiError::NotFound(msg) => ApiError::NotFound(msg),
            CrimeApiError::InvalidResponse(msg) => ApiError::MalformedUpstream(msg),
            CrimeApiError::UpstreamStatus(status) => {
                ApiError::UpstreamUnavailable(format!("upstream status {}", status))
            }
            CrimeApiError::RequestError(e) => ApiError::UpstreamUnavailable(e.to_string()),
        }
    }
}

impl From<ChartError> for ApiError {
    fn from(err: ChartError) -> Self {
        match err {
            ChartError::NotConfigured => ApiError::ChartingUnavailable(err.to_string()),
            other => ApiError::ChartingFailed(other.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(name) => {
                ApiError::Validation(format!("username '{}' is already taken", name))
            }
            other => {
                tracing::error!("User store error: {}", other);
                ApiError::Internal("user store unavailable".to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Store(e) => e.into(),
            AuthError::Hashing(msg) => {
                tracing::error!("Password hashing error: {}", msg);
                ApiError::Internal("credential check failed".to_string())
            }
            AuthError::InvalidCredentials | AuthError::TokenExpired | AuthError::InvalidToken(_) => {
                ApiError::Unauthorized
            }
        }
    }
}

impl From<MonthError> for ApiError {
    fn from(err: MonthError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<SelectionError> for ApiError {
    fn from(err: SelectionError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// Render malformed JSON bodies as a 400 in the usual error shape
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::Validation(format!("Invalid JSON: {}", err)).into()
}
