// SPDX-License-Identifier: Apache-2.0
//! # Card Setup Coordination
//!
//! Issues the credential bundle a client-side SDK needs to tokenize and
//! attach a card: a setup-intent client secret, the owning customer id,
//! and a short-lived ephemeral key. No money moves here.

use std::sync::Arc;

use serde::Serialize;

use pave_core::ids::CustomerId;
use pave_core::profile::EmailAddress;
use pave_processor::api::CardSetupApi;

use crate::customers::CustomerResolver;
use crate::error::FlowError;

/// Processor API version pinned on ephemeral-key issuance.
///
/// The key's representation is version-scoped; pinning keeps the server
/// and the mobile SDK from drifting apart when the processor ships a new
/// default version.
pub const PINNED_PROCESSOR_VERSION: &str = "2023-10-16";

/// The single-use credential bundle handed to the client SDK.
#[derive(Debug, Clone, Serialize)]
pub struct CardSetupCredentials {
    pub setup_intent_client_secret: String,
    pub customer_id: CustomerId,
    pub ephemeral_key_secret: String,
}

/// Coordinates ephemeral-credential issuance for card tokenization.
pub struct CardSetupCoordinator {
    resolver: Arc<CustomerResolver>,
    processor: Arc<dyn CardSetupApi>,
}

impl CardSetupCoordinator {
    pub fn new(resolver: Arc<CustomerResolver>, processor: Arc<dyn CardSetupApi>) -> Self {
        Self {
            resolver,
            processor,
        }
    }

    /// Resolve the customer, open a setup intent, and issue an ephemeral
    /// key. Failures propagate with the failing step's context; the
    /// caller retries interactively, this layer never does.
    pub async fn begin_card_setup(
        &self,
        email: &EmailAddress,
    ) -> Result<CardSetupCredentials, FlowError> {
        let customer = self.resolver.resolve(email).await?;

        let setup_intent = self.processor.create_setup_intent(&customer.id).await?;
        let setup_intent_client_secret =
            setup_intent
                .client_secret
                .ok_or(FlowError::MalformedProcessorResponse {
                    object: "setup_intent",
                    field: "client_secret",
                })?;

        let ephemeral_key = self
            .processor
            .create_ephemeral_key(&customer.id, PINNED_PROCESSOR_VERSION)
            .await?;

        Ok(CardSetupCredentials {
            setup_intent_client_secret,
            customer_id: customer.id,
            ephemeral_key_secret: ephemeral_key.secret,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pave_processor::mock::MockProcessor;

    fn email(raw: &str) -> EmailAddress {
        EmailAddress::new(raw).unwrap()
    }

    fn coordinator(mock: &Arc<MockProcessor>) -> CardSetupCoordinator {
        let resolver = Arc::new(CustomerResolver::new(mock.clone()));
        CardSetupCoordinator::new(resolver, mock.clone())
    }

    #[tokio::test]
    async fn issues_all_three_credentials() {
        let mock = Arc::new(MockProcessor::new());
        let credentials = coordinator(&mock)
            .begin_card_setup(&email("payer@example.com"))
            .await
            .unwrap();

        assert!(credentials.setup_intent_client_secret.contains("secret"));
        assert!(!credentials.ephemeral_key_secret.is_empty());
        assert_eq!(mock.calls("create_setup_intent"), 1);
        assert_eq!(mock.calls("create_ephemeral_key"), 1);
    }

    #[tokio::test]
    async fn pins_the_processor_version_on_key_issuance() {
        let mock = Arc::new(MockProcessor::new());
        coordinator(&mock)
            .begin_card_setup(&email("payer@example.com"))
            .await
            .unwrap();

        assert_eq!(
            mock.last_ephemeral_key_version().as_deref(),
            Some(PINNED_PROCESSOR_VERSION)
        );
    }

    #[tokio::test]
    async fn repeated_setup_reuses_the_customer() {
        let mock = Arc::new(MockProcessor::new());
        let coordinator = coordinator(&mock);

        let first = coordinator
            .begin_card_setup(&email("payer@example.com"))
            .await
            .unwrap();
        let second = coordinator
            .begin_card_setup(&email("payer@example.com"))
            .await
            .unwrap();

        assert_eq!(first.customer_id, second.customer_id);
        assert_eq!(mock.customer_count(), 1);
    }

    #[tokio::test]
    async fn setup_intent_failure_propagates_without_key_issuance() {
        let mock = Arc::new(MockProcessor::new());
        mock.inject_failure("create_setup_intent", 1);

        let err = coordinator(&mock)
            .begin_card_setup(&email("payer@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Processor(_)));
        assert_eq!(mock.calls("create_ephemeral_key"), 0);
    }
}
