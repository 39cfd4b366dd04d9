// SPDX-License-Identifier: Apache-2.0
//! # Customer Resolution
//!
//! Every flow that needs a payer identity resolves it here. The remote
//! customer directory has no uniqueness guarantee on email, so
//! resolution is defensively idempotent at the call site: query by
//! email, take the first exact match, create only when nothing matches.
//!
//! Resolution for a given email runs under a per-email async lock, so
//! two concurrent resolutions of a brand-new email produce exactly one
//! remote customer instead of racing create against create.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use pave_core::profile::EmailAddress;
use pave_processor::api::CustomerApi;
use pave_processor::types::Customer;

use crate::error::FlowError;

/// Page size for the server-side email query. The filter returns at most
/// a handful of records for one email; this bound exists so a directory
/// anomaly cannot stream unbounded data through the client.
const CUSTOMER_PAGE_LIMIT: u16 = 100;

/// Find-or-create resolver over the remote customer directory.
pub struct CustomerResolver {
    processor: Arc<dyn CustomerApi>,
    resolution_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl CustomerResolver {
    pub fn new(processor: Arc<dyn CustomerApi>) -> Self {
        Self {
            processor,
            resolution_locks: DashMap::new(),
        }
    }

    /// Resolve the customer for `email`, creating one if none exists.
    ///
    /// Matching is exact and case-sensitive: two casings of an address
    /// are two distinct payer identities.
    pub async fn resolve(&self, email: &EmailAddress) -> Result<Customer, FlowError> {
        let lock = self
            .resolution_locks
            .entry(email.as_str().to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        let _guard = lock.lock().await;

        let candidates = self
            .processor
            .list_customers(Some(email), CUSTOMER_PAGE_LIMIT)
            .await?;
        if let Some(existing) = candidates
            .into_iter()
            .find(|c| c.email.as_deref() == Some(email.as_str()))
        {
            return Ok(existing);
        }

        let created = self.processor.create_customer(email).await?;
        tracing::info!(
            email = email.as_str(),
            customer_id = created.id.as_str(),
            "created remote customer"
        );
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pave_processor::mock::MockProcessor;

    fn email(raw: &str) -> EmailAddress {
        EmailAddress::new(raw).unwrap()
    }

    #[tokio::test]
    async fn sequential_resolution_is_idempotent() {
        let mock = Arc::new(MockProcessor::new());
        let resolver = CustomerResolver::new(mock.clone());

        let first = resolver.resolve(&email("payer@example.com")).await.unwrap();
        let second = resolver.resolve(&email("payer@example.com")).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(mock.calls("create_customer"), 1);
    }

    #[tokio::test]
    async fn concurrent_resolution_creates_exactly_one_customer() {
        let mock = Arc::new(MockProcessor::new());
        let resolver = Arc::new(CustomerResolver::new(mock.clone()));

        let a = {
            let resolver = resolver.clone();
            tokio::spawn(async move { resolver.resolve(&email("new@example.com")).await })
        };
        let b = {
            let resolver = resolver.clone();
            tokio::spawn(async move { resolver.resolve(&email("new@example.com")).await })
        };

        let first = a.await.unwrap().unwrap();
        let second = b.await.unwrap().unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(mock.customer_count(), 1);
    }

    #[tokio::test]
    async fn distinct_emails_resolve_to_distinct_customers() {
        let mock = Arc::new(MockProcessor::new());
        let resolver = CustomerResolver::new(mock.clone());

        let a = resolver.resolve(&email("a@example.com")).await.unwrap();
        let b = resolver.resolve(&email("b@example.com")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn remote_failure_propagates() {
        let mock = Arc::new(MockProcessor::new());
        mock.inject_failure("list_customers", 1);
        let resolver = CustomerResolver::new(mock.clone());

        let err = resolver.resolve(&email("payer@example.com")).await.unwrap_err();
        assert!(matches!(err, FlowError::Processor(_)));
    }
}
