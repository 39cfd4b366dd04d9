// SPDX-License-Identifier: Apache-2.0
//! Construction-time validation errors for domain primitives.

use thiserror::Error;

/// A domain primitive rejected its input at construction time.
///
/// Carried by the validating newtypes in [`crate::ids`], [`crate::money`]
/// and [`crate::profile`]. The API layer maps this to a field-level
/// validation issue; it never reaches the processor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The value was empty where a non-empty string is required.
    #[error("{field} must not be empty")]
    Empty {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The value did not match the required format.
    #[error("{field} is not a valid {expected}: {value:?}")]
    Malformed {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable description of the expected format.
        expected: &'static str,
        /// The rejected input.
        value: String,
    },

    /// A numeric value was outside its permitted range.
    #[error("{field} out of range: {detail}")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the violated bound.
        detail: &'static str,
    },
}
