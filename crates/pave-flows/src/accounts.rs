// SPDX-License-Identifier: Apache-2.0
//! # Connected-Account Lifecycle
//!
//! Drives a merchant's connected account from creation through detail
//! updates to deletion, keeping the local ledger and the processor in
//! sync.
//!
//! Creation is a two-step saga: remote create, then local ledger upsert.
//! When the local write fails after the remote create succeeded, the
//! manager attempts a compensating remote deletion so the processor
//! never holds an account the platform cannot resolve. A failed
//! compensation is surfaced as [`FlowError::CreateInconsistent`] and
//! logged for operator reconciliation.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use pave_core::ids::AccountId;
use pave_core::profile::{EmailAddress, MerchantProfile, OnboardingDefaults};
use pave_ledger::AccountLedger;
use pave_processor::api::ConnectedAccountApi;
use pave_processor::types::{
    Account, AccountOnboarding, BankAccountParams, CreateAccountParams, DeletedAccount,
    ExternalAccount, UpdateAccountParams,
};

use crate::error::FlowError;

/// Processor test-mode token attached when no payout instrument is
/// supplied. Only resolvable in test mode; production callers pass a
/// real tokenized instrument.
pub const DEFAULT_EXTERNAL_ACCOUNT_TOKEN: &str = "tok_visa_debit";

/// Connected-account lifecycle orchestrator.
pub struct AccountLifecycleManager {
    ledger: AccountLedger,
    processor: Arc<dyn ConnectedAccountApi>,
    defaults: OnboardingDefaults,
}

impl AccountLifecycleManager {
    pub fn new(
        ledger: AccountLedger,
        processor: Arc<dyn ConnectedAccountApi>,
        defaults: OnboardingDefaults,
    ) -> Self {
        Self {
            ledger,
            processor,
            defaults,
        }
    }

    /// Create a connected account and bind it in the ledger.
    ///
    /// The account is created with card-payments and transfers
    /// capabilities requested and the platform-controlled configuration:
    /// the platform collects fees, bears payment losses, and grants the
    /// merchant no processor dashboard. Onboarding fields the platform
    /// does not collect come from the documented placeholder defaults.
    pub async fn create(&self, profile: MerchantProfile) -> Result<AccountId, FlowError> {
        let email = profile.email.clone();
        let country = profile.address.country.clone();
        let onboarding = AccountOnboarding::new(profile, &self.defaults, Utc::now());
        let params = CreateAccountParams { onboarding };

        let idempotency_key = Uuid::new_v4().to_string();
        let account = self
            .processor
            .create_account(&params, Some(&idempotency_key))
            .await?;

        if let Err(ledger_error) = self
            .ledger
            .upsert(&email, "individual", &country, &account.id)
            .await
        {
            tracing::error!(
                account_id = account.id.as_str(),
                error = %ledger_error,
                "ledger write failed after remote create; compensating"
            );
            return match self.processor.delete_account(&account.id).await {
                Ok(_) => Err(FlowError::Ledger(ledger_error)),
                Err(compensation) => {
                    tracing::error!(
                        account_id = account.id.as_str(),
                        error = %compensation,
                        "compensating deletion failed; remote account is orphaned"
                    );
                    Err(FlowError::CreateInconsistent {
                        account_id: account.id,
                        ledger: ledger_error,
                        compensation,
                    })
                }
            };
        }

        tracing::info!(
            email = email.as_str(),
            account_id = account.id.as_str(),
            "connected account created"
        );
        Ok(account.id)
    }

    /// Update the merchant's details with the same profile shape as
    /// create. Makes no remote call when the email is unknown.
    pub async fn update_details(
        &self,
        email: &EmailAddress,
        profile: MerchantProfile,
    ) -> Result<Account, FlowError> {
        let account_id = self.resolve_required(email).await?;
        let onboarding = AccountOnboarding::new(profile, &self.defaults, Utc::now());
        let params = UpdateAccountParams { onboarding };
        Ok(self.processor.update_account(&account_id, &params).await?)
    }

    /// Fetch the merchant's current account snapshot.
    pub async fn retrieve(&self, email: &EmailAddress) -> Result<Account, FlowError> {
        let account_id = self.resolve_required(email).await?;
        Ok(self.processor.retrieve_account(&account_id).await?)
    }

    /// Delete the merchant's remote account. The ledger row is kept: the
    /// row records that this email once onboarded, and a later create
    /// for the same email overwrites the binding.
    pub async fn delete(&self, email: &EmailAddress) -> Result<DeletedAccount, FlowError> {
        let account_id = self.resolve_required(email).await?;
        Ok(self.processor.delete_account(&account_id).await?)
    }

    /// List connected accounts, bounded by `limit`.
    pub async fn list_all(&self, limit: u16) -> Result<Vec<Account>, FlowError> {
        Ok(self.processor.list_accounts(limit).await?)
    }

    /// Administrative rebind: point an email at a different account id.
    /// Fails with [`FlowError::AccountUnresolved`] when no row matched.
    pub async fn rebind(
        &self,
        email: &EmailAddress,
        account_id: &AccountId,
    ) -> Result<u64, FlowError> {
        let affected = self.ledger.rebind(account_id, email).await?;
        if affected == 0 {
            return Err(FlowError::AccountUnresolved {
                email: email.to_string(),
            });
        }
        tracing::info!(
            email = email.as_str(),
            account_id = account_id.as_str(),
            affected,
            "ledger binding reassigned"
        );
        Ok(affected)
    }

    /// Attach an external (payout) account token. `None` falls back to
    /// the documented test-mode token.
    pub async fn add_external_account(
        &self,
        account_id: &AccountId,
        token: Option<&str>,
    ) -> Result<ExternalAccount, FlowError> {
        let token = token.unwrap_or(DEFAULT_EXTERNAL_ACCOUNT_TOKEN);
        Ok(self.processor.add_external_account(account_id, token).await?)
    }

    /// Tokenize raw bank-account details and attach the result as the
    /// account's payout instrument.
    pub async fn attach_bank_account(
        &self,
        account_id: &AccountId,
        bank: BankAccountParams,
    ) -> Result<ExternalAccount, FlowError> {
        let token = self.processor.create_bank_account_token(&bank).await?;
        Ok(self
            .processor
            .add_external_account(account_id, &token.id)
            .await?)
    }

    async fn resolve_required(&self, email: &EmailAddress) -> Result<AccountId, FlowError> {
        self.ledger
            .resolve_external_id(email)
            .await?
            .ok_or_else(|| FlowError::AccountUnresolved {
                email: email.to_string(),
            })
    }
}
