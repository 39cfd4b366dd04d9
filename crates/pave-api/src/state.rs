// SPDX-License-Identifier: Apache-2.0
//! Shared application state for the HTTP surface.

use std::sync::Arc;

use pave_core::fees::FeePolicy;
use pave_core::profile::OnboardingDefaults;
use pave_flows::{
    AccountLifecycleManager, CardSetupCoordinator, CustomerResolver, PaymentOrchestrator,
};
use pave_ledger::AccountLedger;
use pave_processor::api::ProcessorApi;

/// Everything the route handlers need, cheaply cloneable per request.
#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<AccountLifecycleManager>,
    pub payments: Arc<PaymentOrchestrator>,
    pub cards: Arc<CardSetupCoordinator>,
    /// Full-surface processor handle for the thin pass-through routes
    /// (intent retrieval, terminal, saved payment methods).
    pub processor: Arc<dyn ProcessorApi>,
}

impl AppState {
    /// Wire the orchestrators over one processor client, one ledger,
    /// one fee policy and one set of onboarding defaults.
    pub fn new<P>(
        ledger: AccountLedger,
        processor: Arc<P>,
        fee_policy: Arc<dyn FeePolicy>,
        defaults: OnboardingDefaults,
    ) -> Self
    where
        P: ProcessorApi + 'static,
    {
        let resolver = Arc::new(CustomerResolver::new(processor.clone()));
        let lifecycle = Arc::new(AccountLifecycleManager::new(
            ledger.clone(),
            processor.clone(),
            defaults,
        ));
        let payments = Arc::new(PaymentOrchestrator::new(
            resolver.clone(),
            ledger,
            processor.clone(),
            fee_policy,
        ));
        let cards = Arc::new(CardSetupCoordinator::new(resolver, processor.clone()));

        Self {
            lifecycle,
            payments,
            cards,
            processor,
        }
    }
}
