//! HTTP error mapping
//!
//! Every failure leaves the API as `{"error": "..."}` with a matching status.

use crate::evm::EvmError;
use crate::identity::KycError;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

pub const NOT_DEPLOYED_MESSAGE: &str = "Contract not deployed yet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub code: u16,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    pub fn new(code: u16, message: String) -> Self {
        Self { code, message }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new(400, message.to_string())
    }

    pub fn not_found(message: &str) -> Self {
        Self::new(404, message.to_string())
    }

    pub fn internal_server_error(message: &str) -> Self {
        Self::new(500, message.to_string())
    }

    pub fn validation_error(field: &str, reason: &str) -> Self {
        Self::new(400, format!("Invalid {}: {}", field, reason))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API Error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            log::error!("{}", self);
        }
        (status, Json(ErrorBody { error: &self.message })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<EvmError> for ApiError {
    fn from(err: EvmError) -> Self {
        match err {
            EvmError::NotDeployed(_) => Self::not_found(NOT_DEPLOYED_MESSAGE),
            other => Self::internal_server_error(&other.to_string()),
        }
    }
}

impl From<KycError> for ApiError {
    fn from(err: KycError) -> Self {
        Self::bad_request(&err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(&format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::bad_request(&format!("Invalid multipart body: {}", rejection.body_text()))
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::bad_request(&format!("Invalid multipart body: {}", err))
    }
}
