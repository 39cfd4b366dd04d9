// SPDX-License-Identifier: Apache-2.0
//! # pave-flows — Payment & Onboarding Orchestration
//!
//! The flows crate is where Pave's multi-step workflows live. Each
//! orchestrator composes the processor capability traits with the local
//! ledger, runs one operation to completion per request, and suspends
//! only at I/O boundaries:
//!
//! - [`CustomerResolver`] — find-or-create for remote customer records,
//!   serialized per email.
//! - [`CardSetupCoordinator`] — ephemeral credentials for client-side
//!   card tokenization; never moves money.
//! - [`PaymentOrchestrator`] — direct, marketplace (destination-charge)
//!   and card-present checkouts, with the platform fee computed by the
//!   pluggable [`pave_core::fees::FeePolicy`].
//! - [`AccountLifecycleManager`] — connected-account creation (with a
//!   compensating delete when the local write fails), detail updates,
//!   retrieval, deletion and administrative rebinds.
//!
//! Ledger-resolution failures ([`FlowError::AccountUnresolved`],
//! [`FlowError::DestinationUnresolved`]) are distinct from remote
//! failures ([`FlowError::Processor`]) so callers can tell "we don't
//! know this merchant" from "the processor rejected the request".

pub mod accounts;
pub mod cards;
pub mod customers;
pub mod error;
pub mod payments;

pub use accounts::{AccountLifecycleManager, DEFAULT_EXTERNAL_ACCOUNT_TOKEN};
pub use cards::{CardSetupCoordinator, CardSetupCredentials, PINNED_PROCESSOR_VERSION};
pub use customers::CustomerResolver;
pub use error::FlowError;
pub use payments::{CheckoutSession, PaymentOrchestrator};
