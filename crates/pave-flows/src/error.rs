// SPDX-License-Identifier: Apache-2.0
//! Orchestration error taxonomy.

use thiserror::Error;

use pave_core::ids::AccountId;
use pave_ledger::LedgerError;
use pave_processor::ProcessorError;

/// Errors from orchestration flows.
///
/// Resolution failures and remote failures are separate variants on
/// purpose: "we don't know this merchant" is answerable locally and maps
/// to a 404, while a processor rejection carries the processor's own
/// message and maps to an upstream failure.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The ledger has no account binding for this email; the operation
    /// was refused before any remote call.
    #[error("no connected account is registered for {email}")]
    AccountUnresolved { email: String },

    /// A destination charge was requested for an email with no account
    /// binding. Failing here, locally, keeps an empty destination
    /// identifier from ever reaching the processor.
    #[error("no destination account is registered for {email}")]
    DestinationUnresolved { email: String },

    /// Local ledger fault.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Remote processor fault or rejection, message forwarded verbatim.
    #[error(transparent)]
    Processor(#[from] ProcessorError),

    /// A 2xx processor response was missing a field the flow contract
    /// requires (e.g. a client secret on a freshly created intent).
    #[error("processor response missing {field} on {object}")]
    MalformedProcessorResponse {
        object: &'static str,
        field: &'static str,
    },

    /// Account creation succeeded remotely, the local ledger write
    /// failed, and the compensating remote deletion also failed. The
    /// remote account now exists with no local binding; this needs
    /// operator attention and is logged at error level.
    #[error(
        "account {account_id} created remotely but not recorded locally \
         (ledger: {ledger}); compensating deletion failed: {compensation}"
    )]
    CreateInconsistent {
        account_id: AccountId,
        ledger: LedgerError,
        compensation: ProcessorError,
    },
}
