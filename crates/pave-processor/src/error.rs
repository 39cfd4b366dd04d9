// SPDX-License-Identifier: Apache-2.0
//! Processor client error types.

use thiserror::Error;

/// Errors from remote processor calls.
///
/// The processor's own rejection message is carried verbatim in
/// [`ProcessorError::Api`] — callers need it to distinguish "card
/// declined" from "merchant not onboarded", so it is never swallowed
/// or rewritten on the way up.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// Client construction or configuration failure.
    #[error("processor client configuration error: {0}")]
    Config(String),

    /// HTTP transport failure (connection refused, TLS, DNS, …).
    #[error("transport error calling {endpoint}: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },

    /// The request exceeded the client's bounded timeout.
    ///
    /// Distinct from [`ProcessorError::Transport`] so callers can decide
    /// whether a retry is safe — only idempotency-keyed requests are.
    #[error("processor call to {endpoint} timed out")]
    Timeout { endpoint: String },

    /// The processor answered with a non-2xx status. `message` is the
    /// processor's own error message, forwarded verbatim.
    #[error("processor {endpoint} returned {status}: {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
        /// Processor-assigned machine-readable error code, when present.
        code: Option<String>,
    },

    /// A 2xx response body did not match the expected wire shape.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
}

impl ProcessorError {
    /// True when retrying the same request could succeed — transport
    /// faults and timeouts only, never processor-side rejections.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }
}
