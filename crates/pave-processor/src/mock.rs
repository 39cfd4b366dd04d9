// SPDX-License-Identifier: Apache-2.0
//! # In-Memory Mock Processor
//!
//! Deterministic stand-in for the remote processor, used by unit and
//! integration tests and for offline development. Storage is in-memory
//! with no persistence; identifiers are minted from a sequence counter so
//! test assertions are stable.
//!
//! Beyond the capability traits, the mock exposes call counters and an
//! injectable per-operation failure queue so tests can observe exactly
//! which remote operations an orchestration performed.

use std::collections::HashMap;

use dashmap::DashMap;
use parking_lot::Mutex;

use async_trait::async_trait;

use pave_core::ids::{AccountId, CustomerId, PaymentIntentId, PaymentMethodId, ReaderId};
use pave_core::profile::EmailAddress;

use crate::api::{CardSetupApi, ConnectedAccountApi, CustomerApi, PaymentIntentApi, TerminalApi};
use crate::error::ProcessorError;
use crate::types::{
    Account, AccountAddress, AccountBusinessProfile, AccountCompany, AccountOnboarding,
    BankAccountParams, BankToken, ConnectionToken, CreateAccountParams, Customer, DeletedAccount,
    EphemeralKey, ExternalAccount, PaymentIntent, PaymentIntentParams, PaymentMethod, SetupIntent,
    TerminalReader, TransferData, UpdateAccountParams,
};

#[derive(Default)]
struct MockState {
    seq: u64,
    customers: Vec<Customer>,
    accounts: HashMap<String, Account>,
    intents: HashMap<String, PaymentIntent>,
    payment_methods: Vec<PaymentMethod>,
    readers: Vec<TerminalReader>,
    last_ephemeral_key_version: Option<String>,
}

/// In-memory processor double.
#[derive(Default)]
pub struct MockProcessor {
    state: Mutex<MockState>,
    calls: DashMap<&'static str, u64>,
    failures: DashMap<&'static str, u32>,
}

impl MockProcessor {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arrange for the next `count` invocations of `operation` to fail
    /// with a processor-side rejection.
    pub fn inject_failure(&self, operation: &'static str, count: u32) {
        self.failures.insert(operation, count);
    }

    /// How many times `operation` has been invoked.
    pub fn calls(&self, operation: &str) -> u64 {
        self.calls.get(operation).map(|c| *c).unwrap_or(0)
    }

    /// Snapshot of all payment intents created so far.
    pub fn payment_intents(&self) -> Vec<PaymentIntent> {
        self.state.lock().intents.values().cloned().collect()
    }

    /// Whether an account currently exists remotely.
    pub fn account_exists(&self, id: &AccountId) -> bool {
        self.state.lock().accounts.contains_key(id.as_str())
    }

    /// Number of customers in the directory.
    pub fn customer_count(&self) -> usize {
        self.state.lock().customers.len()
    }

    /// The API version pinned on the most recent ephemeral-key issuance.
    pub fn last_ephemeral_key_version(&self) -> Option<String> {
        self.state.lock().last_ephemeral_key_version.clone()
    }

    /// Seed a registered terminal reader.
    pub fn seed_reader(&self, id: &str, label: &str) {
        let mut state = self.state.lock();
        state.readers.push(TerminalReader {
            id: mint(ReaderId::new(id)),
            label: Some(label.to_string()),
            status: Some("online".to_string()),
            device_type: Some("bbpos_wisepos_e".to_string()),
        });
    }

    /// Seed a saved payment method on a customer.
    pub fn seed_payment_method(&self, id: &str, customer: &CustomerId) {
        let mut state = self.state.lock();
        state.payment_methods.push(PaymentMethod {
            id: mint(PaymentMethodId::new(id)),
            method_type: Some("card".to_string()),
            customer: Some(customer.clone()),
        });
    }

    fn record(&self, operation: &'static str) -> Result<(), ProcessorError> {
        *self.calls.entry(operation).or_insert(0) += 1;
        if let Some(mut remaining) = self.failures.get_mut(operation) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(ProcessorError::Api {
                    endpoint: operation.to_string(),
                    status: 402,
                    message: format!("injected failure for {operation}"),
                    code: Some("mock_injected".to_string()),
                });
            }
        }
        Ok(())
    }

    fn next_id(state: &mut MockState, prefix: &str) -> String {
        state.seq += 1;
        format!("{prefix}_{:06}", state.seq)
    }
}

/// Unwrap a freshly minted identifier. Mock ids come from the sequence
/// counter and are never empty.
fn mint<T>(result: Result<T, pave_core::ValidationError>) -> T {
    result.expect("mock-minted identifiers are non-empty")
}

fn account_from_onboarding(id: AccountId, onboarding: &AccountOnboarding) -> Account {
    let profile = &onboarding.profile;
    Account {
        id,
        email: Some(profile.email.as_str().to_string()),
        country: Some(profile.address.country.clone()),
        business_type: Some("individual".to_string()),
        business_profile: Some(AccountBusinessProfile {
            name: Some(profile.business.name.clone()),
            url: Some(profile.business.url.clone()),
            product_description: Some(profile.business.product_description.clone()),
            support_email: Some(profile.email.as_str().to_string()),
            support_phone: Some(profile.phone.clone()),
            support_url: Some(profile.business.support_url.clone()),
            mcc: Some(profile.business.mcc.clone()),
        }),
        company: Some(AccountCompany {
            name: Some(profile.business.name.clone()),
            phone: Some(profile.phone.clone()),
            address: Some(AccountAddress {
                line1: Some(profile.address.line1.clone()),
                city: Some(profile.address.city.clone()),
                state: Some(profile.address.state.clone()),
                postal_code: Some(profile.address.postal_code.clone()),
                country: Some(profile.address.country.clone()),
            }),
        }),
        charges_enabled: false,
        payouts_enabled: false,
    }
}

#[async_trait]
impl CustomerApi for MockProcessor {
    async fn list_customers(
        &self,
        email: Option<&EmailAddress>,
        limit: u16,
    ) -> Result<Vec<Customer>, ProcessorError> {
        self.record("list_customers")?;
        let state = self.state.lock();
        Ok(state
            .customers
            .iter()
            .filter(|c| match email {
                Some(email) => c.email.as_deref() == Some(email.as_str()),
                None => true,
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn create_customer(&self, email: &EmailAddress) -> Result<Customer, ProcessorError> {
        self.record("create_customer")?;
        let mut state = self.state.lock();
        let id = Self::next_id(&mut state, "cus");
        let customer = Customer {
            id: mint(CustomerId::new(id)),
            email: Some(email.as_str().to_string()),
        };
        state.customers.push(customer.clone());
        Ok(customer)
    }
}

#[async_trait]
impl PaymentIntentApi for MockProcessor {
    async fn create_payment_intent(
        &self,
        params: &PaymentIntentParams,
        _idempotency_key: Option<&str>,
    ) -> Result<PaymentIntent, ProcessorError> {
        self.record("create_payment_intent")?;
        let mut state = self.state.lock();
        let id = Self::next_id(&mut state, "pi");
        let intent = PaymentIntent {
            id: mint(PaymentIntentId::new(&id)),
            amount: params.amount,
            currency: params.currency.clone(),
            status: Some("requires_payment_method".to_string()),
            client_secret: Some(format!("{id}_secret_mock")),
            customer: params.customer.clone(),
            application_fee_amount: params.application_fee_amount,
            transfer_data: params
                .transfer_destination
                .clone()
                .map(|destination| TransferData { destination }),
            payment_method_types: if params.payment_method_types.is_empty() {
                vec!["card".to_string()]
            } else {
                params.payment_method_types.clone()
            },
            capture_method: params.capture_method.clone(),
        };
        state.intents.insert(id, intent.clone());
        Ok(intent)
    }

    async fn retrieve_payment_intent(
        &self,
        id: &PaymentIntentId,
    ) -> Result<PaymentIntent, ProcessorError> {
        self.record("retrieve_payment_intent")?;
        let state = self.state.lock();
        state.intents.get(id.as_str()).cloned().ok_or_else(|| {
            ProcessorError::Api {
                endpoint: "retrieve_payment_intent".to_string(),
                status: 404,
                message: format!("No such payment_intent: {id}"),
                code: Some("resource_missing".to_string()),
            }
        })
    }
}

#[async_trait]
impl CardSetupApi for MockProcessor {
    async fn create_setup_intent(
        &self,
        customer: &CustomerId,
    ) -> Result<SetupIntent, ProcessorError> {
        self.record("create_setup_intent")?;
        let mut state = self.state.lock();
        let id = Self::next_id(&mut state, "seti");
        Ok(SetupIntent {
            client_secret: Some(format!("{id}_secret_mock")),
            id: mint(pave_core::ids::SetupIntentId::new(id)),
            customer: Some(customer.clone()),
            status: Some("requires_payment_method".to_string()),
        })
    }

    async fn create_ephemeral_key(
        &self,
        customer: &CustomerId,
        api_version: &str,
    ) -> Result<EphemeralKey, ProcessorError> {
        self.record("create_ephemeral_key")?;
        let mut state = self.state.lock();
        let id = Self::next_id(&mut state, "ephkey");
        state.last_ephemeral_key_version = Some(api_version.to_string());
        Ok(EphemeralKey {
            secret: format!("ek_{}_{}", customer, id),
            id,
        })
    }

    async fn list_payment_methods(
        &self,
        customer: &CustomerId,
    ) -> Result<Vec<PaymentMethod>, ProcessorError> {
        self.record("list_payment_methods")?;
        let state = self.state.lock();
        Ok(state
            .payment_methods
            .iter()
            .filter(|m| m.customer.as_ref() == Some(customer))
            .cloned()
            .collect())
    }

    async fn detach_payment_method(
        &self,
        id: &PaymentMethodId,
    ) -> Result<PaymentMethod, ProcessorError> {
        self.record("detach_payment_method")?;
        let mut state = self.state.lock();
        let position = state
            .payment_methods
            .iter()
            .position(|m| &m.id == id)
            .ok_or_else(|| ProcessorError::Api {
                endpoint: "detach_payment_method".to_string(),
                status: 404,
                message: format!("No such payment_method: {id}"),
                code: Some("resource_missing".to_string()),
            })?;
        let mut method = state.payment_methods.remove(position);
        method.customer = None;
        Ok(method)
    }
}

#[async_trait]
impl ConnectedAccountApi for MockProcessor {
    async fn create_account(
        &self,
        params: &CreateAccountParams,
        _idempotency_key: Option<&str>,
    ) -> Result<Account, ProcessorError> {
        self.record("create_account")?;
        let mut state = self.state.lock();
        let id = Self::next_id(&mut state, "acct");
        let account = account_from_onboarding(mint(AccountId::new(&id)), &params.onboarding);
        state.accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn update_account(
        &self,
        id: &AccountId,
        params: &UpdateAccountParams,
    ) -> Result<Account, ProcessorError> {
        self.record("update_account")?;
        let mut state = self.state.lock();
        if !state.accounts.contains_key(id.as_str()) {
            return Err(ProcessorError::Api {
                endpoint: "update_account".to_string(),
                status: 404,
                message: format!("No such account: {id}"),
                code: Some("resource_missing".to_string()),
            });
        }
        let account = account_from_onboarding(id.clone(), &params.onboarding);
        state.accounts.insert(id.as_str().to_string(), account.clone());
        Ok(account)
    }

    async fn retrieve_account(&self, id: &AccountId) -> Result<Account, ProcessorError> {
        self.record("retrieve_account")?;
        let state = self.state.lock();
        state.accounts.get(id.as_str()).cloned().ok_or_else(|| {
            ProcessorError::Api {
                endpoint: "retrieve_account".to_string(),
                status: 404,
                message: format!("No such account: {id}"),
                code: Some("resource_missing".to_string()),
            }
        })
    }

    async fn delete_account(&self, id: &AccountId) -> Result<DeletedAccount, ProcessorError> {
        self.record("delete_account")?;
        let mut state = self.state.lock();
        if state.accounts.remove(id.as_str()).is_none() {
            return Err(ProcessorError::Api {
                endpoint: "delete_account".to_string(),
                status: 404,
                message: format!("No such account: {id}"),
                code: Some("resource_missing".to_string()),
            });
        }
        Ok(DeletedAccount {
            id: id.clone(),
            deleted: true,
        })
    }

    async fn list_accounts(&self, limit: u16) -> Result<Vec<Account>, ProcessorError> {
        self.record("list_accounts")?;
        let state = self.state.lock();
        Ok(state.accounts.values().take(limit as usize).cloned().collect())
    }

    async fn add_external_account(
        &self,
        id: &AccountId,
        token: &str,
    ) -> Result<ExternalAccount, ProcessorError> {
        self.record("add_external_account")?;
        let state = self.state.lock();
        if !state.accounts.contains_key(id.as_str()) {
            return Err(ProcessorError::Api {
                endpoint: "add_external_account".to_string(),
                status: 404,
                message: format!("No such account: {id}"),
                code: Some("resource_missing".to_string()),
            });
        }
        Ok(ExternalAccount {
            id: format!("ba_{token}"),
            account: Some(id.clone()),
        })
    }

    async fn create_bank_account_token(
        &self,
        _bank: &BankAccountParams,
    ) -> Result<BankToken, ProcessorError> {
        self.record("create_bank_account_token")?;
        let mut state = self.state.lock();
        let id = Self::next_id(&mut state, "btok");
        Ok(BankToken { id })
    }
}

#[async_trait]
impl TerminalApi for MockProcessor {
    async fn create_connection_token(&self) -> Result<ConnectionToken, ProcessorError> {
        self.record("create_connection_token")?;
        let mut state = self.state.lock();
        let id = Self::next_id(&mut state, "tct");
        Ok(ConnectionToken {
            secret: format!("{id}_secret_mock"),
        })
    }

    async fn list_readers(&self, limit: u16) -> Result<Vec<TerminalReader>, ProcessorError> {
        self.record("list_readers")?;
        let state = self.state.lock();
        Ok(state.readers.iter().take(limit as usize).cloned().collect())
    }

    async fn retrieve_reader(&self, id: &ReaderId) -> Result<TerminalReader, ProcessorError> {
        self.record("retrieve_reader")?;
        let state = self.state.lock();
        state
            .readers
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or_else(|| ProcessorError::Api {
                endpoint: "retrieve_reader".to_string(),
                status: 404,
                message: format!("No such reader: {id}"),
                code: Some("resource_missing".to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(raw: &str) -> EmailAddress {
        EmailAddress::new(raw).unwrap()
    }

    #[tokio::test]
    async fn customer_directory_filters_by_exact_email() {
        let mock = MockProcessor::new();
        mock.create_customer(&email("a@example.com")).await.unwrap();
        mock.create_customer(&email("b@example.com")).await.unwrap();

        let hits = mock
            .list_customers(Some(&email("a@example.com")), 10)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].email.as_deref(), Some("a@example.com"));

        let all = mock.list_customers(None, 10).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn injected_failures_are_consumed_in_order() {
        let mock = MockProcessor::new();
        mock.inject_failure("create_customer", 1);

        let err = mock.create_customer(&email("x@example.com")).await.unwrap_err();
        assert!(matches!(err, ProcessorError::Api { status: 402, .. }));

        // Failure budget spent; next call succeeds.
        assert!(mock.create_customer(&email("x@example.com")).await.is_ok());
        assert_eq!(mock.calls("create_customer"), 2);
    }

    #[tokio::test]
    async fn deleted_accounts_stop_resolving() {
        let mock = MockProcessor::new();
        let account_id = AccountId::new("acct_gone").unwrap();
        let err = mock.delete_account(&account_id).await.unwrap_err();
        assert!(matches!(err, ProcessorError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn detach_removes_the_method() {
        let mock = MockProcessor::new();
        let customer = CustomerId::new("cus_1").unwrap();
        mock.seed_payment_method("pm_1", &customer);

        let detached = mock
            .detach_payment_method(&PaymentMethodId::new("pm_1").unwrap())
            .await
            .unwrap();
        assert!(detached.customer.is_none());
        assert!(mock.list_payment_methods(&customer).await.unwrap().is_empty());
    }
}
