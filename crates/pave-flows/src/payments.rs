// SPDX-License-Identifier: Apache-2.0
//! # Checkout Orchestration
//!
//! Builds payment intents for the three checkout shapes Pave supports:
//! direct charges, marketplace destination charges, and card-present
//! terminal charges.
//!
//! A destination charge routes funds to the merchant's connected account
//! minus the platform fee. The destination is resolved from the local
//! ledger **before** anything is created remotely: an email with no
//! binding fails here with [`FlowError::DestinationUnresolved`] instead
//! of sending the processor an empty destination and forwarding its
//! confusing rejection to the payer.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use pave_core::fees::FeePolicy;
use pave_core::ids::PaymentIntentId;
use pave_core::money::{Currency, MinorUnits};
use pave_core::profile::EmailAddress;
use pave_ledger::AccountLedger;
use pave_processor::api::PaymentIntentApi;
use pave_processor::types::{PaymentIntent, PaymentIntentParams};

use crate::customers::CustomerResolver;
use crate::error::FlowError;

/// What a client needs to confirm a checkout: the intent id and its
/// single-use client secret.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSession {
    pub payment_intent_id: PaymentIntentId,
    pub client_secret: String,
}

/// Orchestrates checkout flows against the processor.
pub struct PaymentOrchestrator {
    resolver: Arc<CustomerResolver>,
    ledger: AccountLedger,
    processor: Arc<dyn PaymentIntentApi>,
    fee_policy: Arc<dyn FeePolicy>,
}

impl PaymentOrchestrator {
    pub fn new(
        resolver: Arc<CustomerResolver>,
        ledger: AccountLedger,
        processor: Arc<dyn PaymentIntentApi>,
        fee_policy: Arc<dyn FeePolicy>,
    ) -> Self {
        Self {
            resolver,
            ledger,
            processor,
            fee_policy,
        }
    }

    /// A plain charge attributed to the payer's customer record.
    pub async fn direct_checkout(
        &self,
        email: &EmailAddress,
        amount: MinorUnits,
        currency: Currency,
    ) -> Result<CheckoutSession, FlowError> {
        let customer = self.resolver.resolve(email).await?;
        let params = PaymentIntentParams::direct(amount, currency, customer.id);
        self.create_session(&params).await
    }

    /// A destination charge: the payer is charged `amount`, the
    /// merchant's connected account receives it minus the platform fee.
    pub async fn marketplace_checkout(
        &self,
        email: &EmailAddress,
        amount: MinorUnits,
        currency: Currency,
    ) -> Result<CheckoutSession, FlowError> {
        let customer = self.resolver.resolve(email).await?;

        let destination = self
            .ledger
            .resolve_external_id(email)
            .await?
            .ok_or_else(|| FlowError::DestinationUnresolved {
                email: email.to_string(),
            })?;

        let platform_fee = self.fee_policy.platform_fee(amount);
        tracing::debug!(
            email = email.as_str(),
            amount,
            platform_fee,
            destination = destination.as_str(),
            "building destination charge"
        );

        let params = PaymentIntentParams::destination_charge(
            amount,
            currency,
            customer.id,
            destination,
            platform_fee,
        );
        self.create_session(&params).await
    }

    /// A card-present intent for terminal readers: manual capture after
    /// authorization, no customer binding.
    pub async fn terminal_checkout(
        &self,
        amount: MinorUnits,
        currency: Currency,
    ) -> Result<PaymentIntent, FlowError> {
        let params = PaymentIntentParams::card_present(amount, currency);
        let key = Uuid::new_v4().to_string();
        Ok(self
            .processor
            .create_payment_intent(&params, Some(&key))
            .await?)
    }

    async fn create_session(
        &self,
        params: &PaymentIntentParams,
    ) -> Result<CheckoutSession, FlowError> {
        // A fresh idempotency key per attempt: the create may be retried
        // on transport failure without double-charging.
        let key = Uuid::new_v4().to_string();
        let intent = self.processor.create_payment_intent(params, Some(&key)).await?;
        let client_secret =
            intent
                .client_secret
                .ok_or(FlowError::MalformedProcessorResponse {
                    object: "payment_intent",
                    field: "client_secret",
                })?;
        Ok(CheckoutSession {
            payment_intent_id: intent.id,
            client_secret,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pave_core::fees::SplitPercentFeePolicy;
    use pave_core::ids::AccountId;
    use pave_processor::mock::MockProcessor;

    fn email(raw: &str) -> EmailAddress {
        EmailAddress::new(raw).unwrap()
    }

    fn eur() -> Currency {
        Currency::new("eur").unwrap()
    }

    async fn orchestrator(
        mock: &Arc<MockProcessor>,
    ) -> (PaymentOrchestrator, AccountLedger) {
        let ledger = AccountLedger::in_memory().await.unwrap();
        let resolver = Arc::new(CustomerResolver::new(mock.clone()));
        let orchestrator = PaymentOrchestrator::new(
            resolver,
            ledger.clone(),
            mock.clone(),
            Arc::new(SplitPercentFeePolicy::default()),
        );
        (orchestrator, ledger)
    }

    #[tokio::test]
    async fn direct_checkout_binds_customer_without_fee() {
        let mock = Arc::new(MockProcessor::new());
        let (orchestrator, _ledger) = orchestrator(&mock).await;

        let session = orchestrator
            .direct_checkout(&email("payer@example.com"), 20_000, eur())
            .await
            .unwrap();
        assert!(session.client_secret.ends_with("_secret_mock"));

        let intents = mock.payment_intents();
        assert_eq!(intents.len(), 1);
        assert!(intents[0].customer.is_some());
        assert!(intents[0].application_fee_amount.is_none());
        assert!(intents[0].transfer_data.is_none());
    }

    #[tokio::test]
    async fn marketplace_checkout_splits_the_reference_fee() {
        let mock = Arc::new(MockProcessor::new());
        let (orchestrator, ledger) = orchestrator(&mock).await;
        let payer = email("merchant@example.com");
        ledger
            .upsert(&payer, "individual", "DE", &AccountId::new("acct_dest").unwrap())
            .await
            .unwrap();

        orchestrator
            .marketplace_checkout(&payer, 20_000, eur())
            .await
            .unwrap();

        let intents = mock.payment_intents();
        assert_eq!(intents.len(), 1);
        let intent = &intents[0];
        assert_eq!(intent.amount, 20_000);
        assert_eq!(intent.application_fee_amount, Some(800));
        assert_eq!(
            intent.transfer_data.as_ref().unwrap().destination.as_str(),
            "acct_dest"
        );
    }

    #[tokio::test]
    async fn unresolved_destination_fails_before_any_intent_exists() {
        let mock = Arc::new(MockProcessor::new());
        let (orchestrator, _ledger) = orchestrator(&mock).await;

        let err = orchestrator
            .marketplace_checkout(&email("stranger@example.com"), 20_000, eur())
            .await
            .unwrap_err();

        assert!(matches!(err, FlowError::DestinationUnresolved { .. }));
        assert!(mock.payment_intents().is_empty());
        assert_eq!(mock.calls("create_payment_intent"), 0);
    }

    #[tokio::test]
    async fn terminal_checkout_is_card_present_with_manual_capture() {
        let mock = Arc::new(MockProcessor::new());
        let (orchestrator, _ledger) = orchestrator(&mock).await;

        let intent = orchestrator.terminal_checkout(5_000, eur()).await.unwrap();
        assert_eq!(intent.payment_method_types, vec!["card_present".to_string()]);
        assert_eq!(intent.capture_method.as_deref(), Some("manual"));
        assert!(intent.customer.is_none());
    }

    #[tokio::test]
    async fn processor_rejection_propagates_with_its_message() {
        let mock = Arc::new(MockProcessor::new());
        let (orchestrator, _ledger) = orchestrator(&mock).await;
        mock.inject_failure("create_payment_intent", 1);

        let err = orchestrator
            .direct_checkout(&email("payer@example.com"), 20_000, eur())
            .await
            .unwrap_err();
        match err {
            FlowError::Processor(processor_error) => {
                assert!(processor_error.to_string().contains("injected failure"));
            }
            other => panic!("expected processor error, got {other:?}"),
        }
    }
}
