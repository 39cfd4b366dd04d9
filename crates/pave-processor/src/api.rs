// SPDX-License-Identifier: Apache-2.0
//! # Processor Capability Traits
//!
//! One trait per capability family. All traits are object-safe and
//! `Send + Sync` so implementations can be shared via `Arc<dyn …>`
//! across request tasks. [`ProcessorApi`] bundles the families for
//! call sites that hold a single full-surface client.
//!
//! Two implementations exist: [`crate::http::HttpProcessorClient`]
//! (production) and [`crate::mock::MockProcessor`] (tests, offline
//! development).

use async_trait::async_trait;

use pave_core::ids::{AccountId, CustomerId, PaymentIntentId, PaymentMethodId, ReaderId};
use pave_core::profile::EmailAddress;

use crate::error::ProcessorError;
use crate::types::{
    Account, BankAccountParams, BankToken, ConnectionToken, CreateAccountParams, Customer,
    DeletedAccount, EphemeralKey, ExternalAccount, PaymentIntent, PaymentIntentParams,
    PaymentMethod, SetupIntent, TerminalReader, UpdateAccountParams,
};

/// Customer directory operations.
#[async_trait]
pub trait CustomerApi: Send + Sync {
    /// List customers, optionally filtered by email server-side, bounded
    /// by `limit`. The filter avoids paging the whole directory through
    /// the client on every resolution.
    async fn list_customers(
        &self,
        email: Option<&EmailAddress>,
        limit: u16,
    ) -> Result<Vec<Customer>, ProcessorError>;

    /// Create a customer bound to an email.
    async fn create_customer(&self, email: &EmailAddress) -> Result<Customer, ProcessorError>;
}

/// Payment-intent operations.
#[async_trait]
pub trait PaymentIntentApi: Send + Sync {
    /// Create a payment intent. When `idempotency_key` is set, transport
    /// failures may be retried safely by the implementation.
    async fn create_payment_intent(
        &self,
        params: &PaymentIntentParams,
        idempotency_key: Option<&str>,
    ) -> Result<PaymentIntent, ProcessorError>;

    /// Retrieve a payment intent by id.
    async fn retrieve_payment_intent(
        &self,
        id: &PaymentIntentId,
    ) -> Result<PaymentIntent, ProcessorError>;
}

/// Card-setup operations: setup intents, ephemeral keys, saved methods.
#[async_trait]
pub trait CardSetupApi: Send + Sync {
    /// Create a setup intent scoped to a customer.
    async fn create_setup_intent(
        &self,
        customer: &CustomerId,
    ) -> Result<SetupIntent, ProcessorError>;

    /// Issue a short-lived ephemeral key for a customer under a pinned
    /// processor API version, so client and server agree on the
    /// representation the key unlocks.
    async fn create_ephemeral_key(
        &self,
        customer: &CustomerId,
        api_version: &str,
    ) -> Result<EphemeralKey, ProcessorError>;

    /// List payment methods saved on a customer.
    async fn list_payment_methods(
        &self,
        customer: &CustomerId,
    ) -> Result<Vec<PaymentMethod>, ProcessorError>;

    /// Detach a saved payment method from its customer.
    async fn detach_payment_method(
        &self,
        id: &PaymentMethodId,
    ) -> Result<PaymentMethod, ProcessorError>;
}

/// Connected-account lifecycle and payout-instrument operations.
#[async_trait]
pub trait ConnectedAccountApi: Send + Sync {
    /// Create a connected account. When `idempotency_key` is set,
    /// transport failures may be retried safely by the implementation.
    async fn create_account(
        &self,
        params: &CreateAccountParams,
        idempotency_key: Option<&str>,
    ) -> Result<Account, ProcessorError>;

    /// Update a connected account's details.
    async fn update_account(
        &self,
        id: &AccountId,
        params: &UpdateAccountParams,
    ) -> Result<Account, ProcessorError>;

    /// Retrieve a connected account snapshot.
    async fn retrieve_account(&self, id: &AccountId) -> Result<Account, ProcessorError>;

    /// Delete a connected account on the processor.
    async fn delete_account(&self, id: &AccountId) -> Result<DeletedAccount, ProcessorError>;

    /// List connected accounts, bounded by `limit`.
    async fn list_accounts(&self, limit: u16) -> Result<Vec<Account>, ProcessorError>;

    /// Attach an external (payout) account token to a connected account.
    async fn add_external_account(
        &self,
        id: &AccountId,
        token: &str,
    ) -> Result<ExternalAccount, ProcessorError>;

    /// Tokenize raw bank-account details for later attachment.
    async fn create_bank_account_token(
        &self,
        bank: &BankAccountParams,
    ) -> Result<BankToken, ProcessorError>;
}

/// Terminal (card-present) operations.
#[async_trait]
pub trait TerminalApi: Send + Sync {
    /// Create a connection token for a reader to connect with.
    async fn create_connection_token(&self) -> Result<ConnectionToken, ProcessorError>;

    /// List registered readers, bounded by `limit`.
    async fn list_readers(&self, limit: u16) -> Result<Vec<TerminalReader>, ProcessorError>;

    /// Retrieve a reader by id.
    async fn retrieve_reader(&self, id: &ReaderId) -> Result<TerminalReader, ProcessorError>;
}

/// The full processor capability surface.
///
/// Blanket-implemented for anything implementing every family, so a
/// single `Arc<dyn ProcessorApi>` can be handed to the API state while
/// individual flows depend only on the family they use.
pub trait ProcessorApi:
    CustomerApi + PaymentIntentApi + CardSetupApi + ConnectedAccountApi + TerminalApi
{
}

impl<T> ProcessorApi for T where
    T: CustomerApi + PaymentIntentApi + CardSetupApi + ConnectedAccountApi + TerminalApi
{
}
