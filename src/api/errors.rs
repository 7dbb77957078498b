// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::acquire::{AcquireError, FetchError};
use crate::classifier::PredictError;
use crate::ranking::ContractViolation;
use crate::vision::DecodeError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

/// HTTP-level error for the classification endpoints.
///
/// Client errors carry the failing stage (acquire/fetch/decode) in the
/// error type; classifier-contract faults are server errors and are
/// never downgraded to an empty ranking.
#[derive(Debug, Clone)]
pub enum ApiError {
    InvalidRequest(String),
    AcquisitionFailed(String),
    FetchFailed { url: String, message: String },
    DecodeFailed(String),
    ModelContract(String),
    InferenceFailed(String),
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let (error_type, message, details) = match self {
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone(), None),
            ApiError::AcquisitionFailed(msg) => ("acquisition_failed", msg.clone(), None),
            ApiError::FetchFailed { url, message } => {
                let mut details = HashMap::new();
                details.insert("url".to_string(), serde_json::Value::String(url.clone()));
                ("fetch_failed", message.clone(), Some(details))
            }
            ApiError::DecodeFailed(msg) => ("decode_failed", msg.clone(), None),
            ApiError::ModelContract(msg) => ("model_contract_violation", msg.clone(), None),
            ApiError::InferenceFailed(msg) => ("inference_failed", msg.clone(), None),
            ApiError::InternalError(msg) => ("internal_error", msg.clone(), None),
        };

        ErrorResponse {
            error_type: error_type.to_string(),
            message,
            details,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_)
            | ApiError::AcquisitionFailed(_)
            | ApiError::FetchFailed { .. }
            | ApiError::DecodeFailed(_) => 400,
            ApiError::ModelContract(_)
            | ApiError::InferenceFailed(_)
            | ApiError::InternalError(_) => 500,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::AcquisitionFailed(msg) => write!(f, "Acquisition failed: {}", msg),
            ApiError::FetchFailed { url, message } => {
                write!(f, "Fetch from '{}' failed: {}", url, message)
            }
            ApiError::DecodeFailed(msg) => write!(f, "Decode failed: {}", msg),
            ApiError::ModelContract(msg) => write!(f, "Model contract violation: {}", msg),
            ApiError::InferenceFailed(msg) => write!(f, "Inference failed: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::response::Json(self.to_response())).into_response()
    }
}

impl From<AcquireError> for ApiError {
    fn from(e: AcquireError) -> Self {
        match e {
            AcquireError::MissingFileField => ApiError::InvalidRequest(e.to_string()),
            _ => ApiError::AcquisitionFailed(e.to_string()),
        }
    }
}

impl From<FetchError> for ApiError {
    fn from(e: FetchError) -> Self {
        match &e {
            FetchError::InvalidUrl(url)
            | FetchError::Request { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::TooLarge { url, .. } => ApiError::FetchFailed {
                url: url.clone(),
                message: e.to_string(),
            },
        }
    }
}

impl From<DecodeError> for ApiError {
    fn from(e: DecodeError) -> Self {
        ApiError::DecodeFailed(e.to_string())
    }
}

impl From<ContractViolation> for ApiError {
    fn from(e: ContractViolation) -> Self {
        ApiError::ModelContract(e.to_string())
    }
}

impl From<PredictError> for ApiError {
    fn from(e: PredictError) -> Self {
        ApiError::InferenceFailed(e.to_string())
    }
}
