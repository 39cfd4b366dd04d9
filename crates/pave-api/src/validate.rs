// SPDX-License-Identifier: Apache-2.0
//! # Request Field Validation
//!
//! Field-level validation for inbound request bodies, run before any
//! flow is invoked. Failures collect into a list of [`FieldIssue`]s and
//! come back as one 422 response naming every bad field, instead of
//! failing on the first.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use pave_core::money::{Currency, MinorUnits};
use pave_core::profile::EmailAddress;

use crate::error::ApiError;

/// One field that failed validation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

/// Accumulator for field issues across a request body.
#[derive(Debug, Default)]
pub struct Issues(Vec<FieldIssue>);

impl Issues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldIssue {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Finish validation: `Ok(())` when nothing was collected.
    pub fn finish(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation { issues: self.0 })
        }
    }

    /// Validate an email field.
    pub fn email(&mut self, field: &str, raw: &str) -> Option<EmailAddress> {
        match EmailAddress::new(raw) {
            Ok(email) => Some(email),
            Err(e) => {
                self.push(field, e.to_string());
                None
            }
        }
    }

    /// Validate a currency code field.
    pub fn currency(&mut self, field: &str, raw: &str) -> Option<Currency> {
        match Currency::new(raw) {
            Ok(currency) => Some(currency),
            Err(e) => {
                self.push(field, e.to_string());
                None
            }
        }
    }

    /// Validate a positive minor-unit amount.
    pub fn positive_amount(&mut self, field: &str, amount: MinorUnits) -> Option<MinorUnits> {
        if amount > 0 {
            Some(amount)
        } else {
            self.push(field, "must be a positive amount in minor units");
            None
        }
    }

    /// Require a non-empty string field.
    pub fn non_empty(&mut self, field: &str, raw: &str) -> Option<String> {
        if raw.trim().is_empty() {
            self.push(field, "must not be empty");
            None
        } else {
            Some(raw.to_string())
        }
    }

    /// Require an absolute http(s) URL.
    pub fn url(&mut self, field: &str, raw: &str) -> Option<String> {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Some(raw.to_string())
        } else {
            self.push(field, "must be an absolute http(s) URL");
            None
        }
    }
}

/// Validate a single identifier field (path or body), reporting it as a
/// one-item issue list on failure.
pub fn path_field<T>(
    field: &str,
    result: Result<T, pave_core::ValidationError>,
) -> Result<T, ApiError> {
    result.map_err(|e| ApiError::Validation {
        issues: vec![FieldIssue {
            field: field.to_string(),
            message: e.to_string(),
        }],
    })
}

/// Unwrap a field that passed validation.
///
/// The value is `None` only when an issue was recorded, and `finish()`
/// already returned the 422 in that case; this propagates an internal
/// error instead of panicking if the two ever disagree.
pub fn validated<T>(field: &'static str, value: Option<T>) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::Internal(format!("field {field} missing after validation")))
}
