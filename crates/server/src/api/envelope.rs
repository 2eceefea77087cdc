//! Response envelope shared by every `/api/v1` endpoint except health and config.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use pansearch_core::{CatalogError, DownloadError, HelpRequestError};

/// `{code, message, data, timestamp}` with `timestamp` in unix milliseconds.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
    pub timestamp: i64,
}

/// Wrap a payload in a `200 success` envelope.
pub fn success<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code: StatusCode::OK.as_u16(),
        message: "success".to_string(),
        data: Some(data),
        timestamp: Utc::now().timestamp_millis(),
    })
}

/// Error turned into an enveloped response with `data: null`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()> {
            code: self.status.as_u16(),
            message: self.message,
            data: None,
            timestamp: Utc::now().timestamp_millis(),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        tracing::error!("Catalog error: {}", e);
        ApiError::internal()
    }
}

impl From<DownloadError> for ApiError {
    fn from(e: DownloadError) -> Self {
        match e {
            DownloadError::NotFound(_) => ApiError::not_found("Resource not found"),
            DownloadError::Store(e) => e.into(),
        }
    }
}

impl From<HelpRequestError> for ApiError {
    fn from(e: HelpRequestError) -> Self {
        match e {
            HelpRequestError::Validation(reason) => {
                tracing::debug!("Rejected help request: {}", reason);
                ApiError::bad_request("Invalid request parameters")
            }
            HelpRequestError::Store(e) => e.into(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        tracing::debug!("Rejected query string: {}", e);
        ApiError::bad_request("Invalid request parameters")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        tracing::debug!("Rejected JSON body: {}", e);
        ApiError::bad_request("Invalid request parameters")
    }
}
