// SPDX-License-Identifier: Apache-2.0
//! # End-to-End Merchant Journey
//!
//! One story across every crate: a merchant onboards as a connected
//! account, saves a card, sells through a marketplace checkout with the
//! platform fee split, updates their details, and finally offboards —
//! all over the mock processor and a real (in-memory) SQLite ledger.

use std::sync::Arc;

use pave_core::fees::SplitPercentFeePolicy;
use pave_core::money::Currency;
use pave_core::profile::{
    Address, BusinessProfile, EmailAddress, MerchantProfile, OnboardingDefaults, PersonName,
};
use pave_flows::{
    AccountLifecycleManager, CardSetupCoordinator, CustomerResolver, FlowError,
    PaymentOrchestrator,
};
use pave_ledger::AccountLedger;
use pave_processor::mock::MockProcessor;

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

struct Stack {
    mock: Arc<MockProcessor>,
    ledger: AccountLedger,
    lifecycle: AccountLifecycleManager,
    payments: PaymentOrchestrator,
    cards: CardSetupCoordinator,
}

async fn stack() -> Stack {
    let mock = Arc::new(MockProcessor::new());
    let ledger = AccountLedger::in_memory().await.unwrap();
    let resolver = Arc::new(CustomerResolver::new(mock.clone()));
    let lifecycle = AccountLifecycleManager::new(
        ledger.clone(),
        mock.clone(),
        OnboardingDefaults::default(),
    );
    let payments = PaymentOrchestrator::new(
        resolver.clone(),
        ledger.clone(),
        mock.clone(),
        Arc::new(SplitPercentFeePolicy::default()),
    );
    let cards = CardSetupCoordinator::new(resolver, mock.clone());
    Stack {
        mock,
        ledger,
        lifecycle,
        payments,
        cards,
    }
}

fn merchant_profile(email: &str) -> MerchantProfile {
    MerchantProfile {
        email: EmailAddress::new(email).unwrap(),
        person: PersonName {
            first_name: "Jenny".to_string(),
            last_name: "Rosen".to_string(),
        },
        phone: "+4915123456789".to_string(),
        business: BusinessProfile {
            name: "Rosen Flowers".to_string(),
            url: "https://rosen.example.com".to_string(),
            product_description: "Fresh flowers".to_string(),
            support_url: "https://rosen.example.com/support".to_string(),
            mcc: "5992".to_string(),
        },
        address: Address {
            line1: "Blumenstr. 1".to_string(),
            city: "Berlin".to_string(),
            state: "BE".to_string(),
            postal_code: "10115".to_string(),
            country: "DE".to_string(),
        },
    }
}

fn eur() -> Currency {
    Currency::new("eur").unwrap()
}

// ---------------------------------------------------------------------------
// The journey
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_merchant_journey() {
    let stack = stack().await;
    let email = EmailAddress::new("merchant@example.com").unwrap();

    // Act 1 — onboarding binds the ledger to the processor-issued id.
    let account_id = stack
        .lifecycle
        .create(merchant_profile("merchant@example.com"))
        .await
        .unwrap();
    assert_eq!(
        stack.ledger.resolve_external_id(&email).await.unwrap(),
        Some(account_id.clone())
    );

    // Act 2 — the merchant saves a card; the same customer record is
    // reused across setup and checkout.
    let credentials = stack.cards.begin_card_setup(&email).await.unwrap();
    assert!(!credentials.ephemeral_key_secret.is_empty());

    // Act 3 — a marketplace sale: 20000 minor units, 2%+2% platform fee,
    // funds routed to the merchant's account.
    let session = stack
        .payments
        .marketplace_checkout(&email, 20_000, eur())
        .await
        .unwrap();
    assert!(!session.client_secret.is_empty());

    let intents = stack.mock.payment_intents();
    assert_eq!(intents.len(), 1);
    let intent = &intents[0];
    assert_eq!(intent.amount, 20_000);
    assert_eq!(intent.application_fee_amount, Some(800));
    assert_eq!(
        intent.transfer_data.as_ref().unwrap().destination,
        account_id
    );
    assert_eq!(intent.customer, Some(credentials.customer_id.clone()));
    assert_eq!(stack.mock.customer_count(), 1);

    // Act 4 — details update flows through to the stored snapshot.
    let mut updated = merchant_profile("merchant@example.com");
    updated.business.name = "Rosen Flowers GmbH".to_string();
    stack
        .lifecycle
        .update_details(&email, updated)
        .await
        .unwrap();
    let snapshot = stack.lifecycle.retrieve(&email).await.unwrap();
    assert_eq!(
        snapshot.business_profile.unwrap().name.as_deref(),
        Some("Rosen Flowers GmbH")
    );

    // Act 5 — offboarding deletes remotely but keeps the ledger row, and
    // a fresh onboarding for the same email overwrites the binding.
    stack.lifecycle.delete(&email).await.unwrap();
    assert!(!stack.mock.account_exists(&account_id));
    assert!(stack.ledger.get_by_email(&email).await.unwrap().is_some());

    let second_id = stack
        .lifecycle
        .create(merchant_profile("merchant@example.com"))
        .await
        .unwrap();
    assert_ne!(second_id, account_id);
    assert_eq!(
        stack.ledger.resolve_external_id(&email).await.unwrap(),
        Some(second_id)
    );
}

#[tokio::test]
async fn direct_checkout_needs_no_merchant_onboarding() {
    let stack = stack().await;
    let payer = EmailAddress::new("payer@example.com").unwrap();

    let session = stack
        .payments
        .direct_checkout(&payer, 5_000, eur())
        .await
        .unwrap();
    assert!(!session.client_secret.is_empty());

    let intents = stack.mock.payment_intents();
    assert_eq!(intents.len(), 1);
    assert!(intents[0].transfer_data.is_none());
    assert!(intents[0].application_fee_amount.is_none());
}

#[tokio::test]
async fn marketplace_checkout_without_onboarding_fails_locally() {
    let stack = stack().await;
    let payer = EmailAddress::new("payer@example.com").unwrap();

    let err = stack
        .payments
        .marketplace_checkout(&payer, 20_000, eur())
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::DestinationUnresolved { .. }));
    assert_eq!(stack.mock.calls("create_payment_intent"), 0);
}

#[tokio::test]
async fn ledger_survives_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.sqlite");
    let mock = Arc::new(MockProcessor::new());
    let email = EmailAddress::new("merchant@example.com").unwrap();

    let account_id = {
        let ledger = AccountLedger::connect(&path).await.unwrap();
        let lifecycle = AccountLifecycleManager::new(
            ledger.clone(),
            mock.clone(),
            OnboardingDefaults::default(),
        );
        let id = lifecycle
            .create(merchant_profile("merchant@example.com"))
            .await
            .unwrap();
        ledger.close().await;
        id
    };

    // A new process over the same file still resolves the merchant.
    let reopened = AccountLedger::connect(&path).await.unwrap();
    assert_eq!(
        reopened.resolve_external_id(&email).await.unwrap(),
        Some(account_id)
    );
}
