// SPDX-License-Identifier: Apache-2.0
//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps the flow-layer taxonomy to HTTP status codes and JSON error
//! bodies with a machine-readable code, a message, and optional
//! field-level details.
//!
//! Processor rejection messages are client-relevant (card declined,
//! onboarding incomplete, …) and are forwarded verbatim. Internal
//! faults — ledger storage, inconsistent create state — are logged but
//! never exposed beyond a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use pave_flows::FlowError;
use pave_processor::ProcessorError;

use crate::validate::FieldIssue;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "VALIDATION_ERROR", "UPSTREAM_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Field-level issues, present only for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldIssue>>,
}

/// Application-level error type for the HTTP surface.
#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more request fields were malformed or missing (422).
    #[error("validation failed on {} field(s)", .issues.len())]
    Validation { issues: Vec<FieldIssue> },

    /// The requested mapping or object does not exist locally (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The processor rejected or failed the call (502). The message is
    /// the processor's own, forwarded verbatim.
    #[error("upstream processor error: {message}")]
    Upstream {
        message: String,
        code: Option<String>,
    },

    /// Internal fault (500). Message is logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),

    /// Remote create succeeded but local state could not be brought in
    /// sync and compensation failed (500, distinct code so operators and
    /// clients can tell this apart from a plain internal fault).
    #[error("inconsistent account state: {0}")]
    Inconsistent(String),
}

impl From<FlowError> for ApiError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::AccountUnresolved { .. } | FlowError::DestinationUnresolved { .. } => {
                Self::NotFound(err.to_string())
            }
            FlowError::Processor(processor) => processor.into(),
            FlowError::Ledger(ledger) => Self::Internal(ledger.to_string()),
            FlowError::MalformedProcessorResponse { .. } => Self::Internal(err.to_string()),
            FlowError::CreateInconsistent { .. } => Self::Inconsistent(err.to_string()),
        }
    }
}

impl From<ProcessorError> for ApiError {
    fn from(err: ProcessorError) -> Self {
        match err {
            ProcessorError::Api { message, code, .. } => Self::Upstream { message, code },
            other => Self::Upstream {
                message: other.to_string(),
                code: None,
            },
        }
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Upstream { .. } => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::Inconsistent(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INCONSISTENT_STATE"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Internal details stay in the logs.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::Inconsistent(_) => {
                "Account creation left inconsistent state; contact support".to_string()
            }
            other => other.to_string(),
        };

        match &self {
            Self::Internal(detail) => tracing::error!(%detail, "internal server error"),
            Self::Inconsistent(detail) => tracing::error!(%detail, "inconsistent account state"),
            Self::Upstream { message, .. } => tracing::warn!(%message, "upstream processor error"),
            _ => {}
        }

        let details = match self {
            Self::Validation { issues } => Some(issues),
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pave_ledger::LedgerError;

    #[test]
    fn resolution_failures_map_to_not_found() {
        let err: ApiError = FlowError::DestinationUnresolved {
            email: "x@example.com".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn processor_rejections_keep_their_message() {
        let err: ApiError = FlowError::Processor(ProcessorError::Api {
            endpoint: "v1/payment_intents".to_string(),
            status: 402,
            message: "Your card was declined.".to_string(),
            code: Some("card_declined".to_string()),
        })
        .into();
        match err {
            ApiError::Upstream { message, code } => {
                assert_eq!(message, "Your card was declined.");
                assert_eq!(code.as_deref(), Some("card_declined"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[test]
    fn ledger_faults_become_internal() {
        let err: ApiError = FlowError::Ledger(LedgerError::Corrupt {
            detail: "bad row".to_string(),
        })
        .into();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
