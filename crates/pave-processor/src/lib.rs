// SPDX-License-Identifier: Apache-2.0
//! # pave-processor — Remote Payment-Processor Client
//!
//! Capability surface for the remote card-payment processor. The rest of
//! the stack never talks HTTP: it consumes the per-family adapter traits
//! in [`api`] behind `Arc<dyn …>`, so orchestration code is testable
//! against the in-memory [`mock::MockProcessor`] and deployable against
//! the real [`http::HttpProcessorClient`].
//!
//! ## Adapter Families
//!
//! - [`api::CustomerApi`] — customer directory (list with server-side
//!   email filter, create)
//! - [`api::PaymentIntentApi`] — payment intents (create, retrieve)
//! - [`api::CardSetupApi`] — setup intents, ephemeral keys, saved
//!   payment methods
//! - [`api::ConnectedAccountApi`] — connected-account lifecycle and
//!   payout instruments
//! - [`api::TerminalApi`] — card-present readers and connection tokens
//!
//! ## Timeout & Retry
//!
//! Every HTTP request carries a bounded timeout (configurable, default
//! 30s). Transport retries are NOT automatic: the client retries only
//! requests that carry an idempotency key — see [`retry`].

pub mod api;
pub mod error;
pub mod http;
pub mod mock;
pub mod retry;
pub mod types;

pub use api::{
    CardSetupApi, ConnectedAccountApi, CustomerApi, PaymentIntentApi, ProcessorApi, TerminalApi,
};
pub use error::ProcessorError;
pub use http::{HttpProcessorClient, ProcessorConfig};
