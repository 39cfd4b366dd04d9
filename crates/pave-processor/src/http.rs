// SPDX-License-Identifier: Apache-2.0
//! # HTTP Processor Client
//!
//! Production implementation of the capability traits over the
//! processor's REST API. Wraps a `reqwest::Client` with bearer
//! authentication, a bounded per-request timeout, form-encoded request
//! bodies, and consistent error mapping: timeouts are distinguished from
//! other transport faults, and non-2xx responses surface the processor's
//! own error message verbatim.
//!
//! Retries happen only for requests carrying an idempotency key — see
//! [`crate::retry`].

use std::time::Duration;

use serde::de::DeserializeOwned;

use async_trait::async_trait;

use pave_core::ids::{AccountId, CustomerId, PaymentIntentId, PaymentMethodId, ReaderId};
use pave_core::profile::EmailAddress;

use crate::api::{CardSetupApi, ConnectedAccountApi, CustomerApi, PaymentIntentApi, TerminalApi};
use crate::error::ProcessorError;
use crate::retry;
use crate::types::{
    Account, BankAccountParams, BankToken, ConnectionToken, CreateAccountParams, Customer,
    DeletedAccount, EphemeralKey, ExternalAccount, FormPair, ListPage, PaymentIntent,
    PaymentIntentParams, PaymentMethod, SetupIntent, TerminalReader, UpdateAccountParams,
};

/// Header carrying the caller-chosen idempotency key.
const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Header pinning the processor API version for a single request.
const VERSION_HEADER: &str = "Processor-Version";

/// Configuration for the HTTP processor client.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Base URL of the processor API (e.g. `https://api.processor.example`).
    pub base_url: String,
    /// Platform secret key used as the bearer credential.
    pub secret_key: String,
    /// Per-request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl ProcessorConfig {
    /// Create a configuration with the default timeout.
    pub fn new(base_url: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            secret_key: secret_key.into(),
            timeout_secs: 30,
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Error body wire shape: `{ "error": { "message": …, "code": … } }`.
#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    error: ErrorPayload,
}

#[derive(serde::Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// Extract the processor's message and code from an error body, falling
/// back to the raw body when it is not the expected envelope.
fn parse_error_body(body: &str) -> (String, Option<String>) {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => (
            envelope
                .error
                .message
                .unwrap_or_else(|| body.to_string()),
            envelope.error.code,
        ),
        Err(_) => (body.to_string(), None),
    }
}

/// Production HTTP client for the processor's REST API.
#[derive(Debug, Clone)]
pub struct HttpProcessorClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProcessorClient {
    /// Build a client from configuration.
    pub fn new(config: ProcessorConfig) -> Result<Self, ProcessorError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_str(&format!("Bearer {}", config.secret_key))
                .map_err(|_| {
                    ProcessorError::Config("secret key contains invalid header characters".into())
                })?,
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| ProcessorError::Config(format!("failed to build HTTP client: {e}")))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// POST a form body. Requests with an idempotency key are retried on
    /// transient transport failures; unkeyed requests are sent once.
    async fn post_form<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: &[FormPair],
        idempotency_key: Option<&str>,
        extra_headers: &[(&str, &str)],
    ) -> Result<T, ProcessorError> {
        let url = self.url(endpoint);
        let send_once = || {
            let mut req = self.client.post(&url).form(form);
            if let Some(key) = idempotency_key {
                req = req.header(IDEMPOTENCY_KEY_HEADER, key);
            }
            for (name, value) in extra_headers {
                req = req.header(*name, *value);
            }
            req.send()
        };

        let result = if idempotency_key.is_some() {
            retry::retry_send(endpoint, send_once).await
        } else {
            send_once().await
        };
        self.handle(endpoint, result).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProcessorError> {
        let result = self
            .client
            .get(self.url(endpoint))
            .query(query)
            .send()
            .await;
        self.handle(endpoint, result).await
    }

    async fn delete_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ProcessorError> {
        let result = self.client.delete(self.url(endpoint)).send().await;
        self.handle(endpoint, result).await
    }

    /// Map the transport result and response status into the error
    /// taxonomy, deserializing the body on success.
    async fn handle<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        result: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<T, ProcessorError> {
        let resp = result.map_err(|e| {
            if e.is_timeout() {
                ProcessorError::Timeout {
                    endpoint: endpoint.to_string(),
                }
            } else {
                ProcessorError::Transport {
                    endpoint: endpoint.to_string(),
                    source: e,
                }
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let (message, code) = parse_error_body(&body);
            tracing::warn!(endpoint, status = status.as_u16(), %message, "processor rejected request");
            return Err(ProcessorError::Api {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
                code,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| ProcessorError::Deserialization {
                endpoint: endpoint.to_string(),
                source: e,
            })
    }
}

#[async_trait]
impl CustomerApi for HttpProcessorClient {
    async fn list_customers(
        &self,
        email: Option<&EmailAddress>,
        limit: u16,
    ) -> Result<Vec<Customer>, ProcessorError> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(email) = email {
            query.push(("email", email.as_str().to_string()));
        }
        let page: ListPage<Customer> = self.get_json("v1/customers", &query).await?;
        Ok(page.data)
    }

    async fn create_customer(&self, email: &EmailAddress) -> Result<Customer, ProcessorError> {
        let form = vec![("email".to_string(), email.as_str().to_string())];
        self.post_form("v1/customers", &form, None, &[]).await
    }
}

#[async_trait]
impl PaymentIntentApi for HttpProcessorClient {
    async fn create_payment_intent(
        &self,
        params: &PaymentIntentParams,
        idempotency_key: Option<&str>,
    ) -> Result<PaymentIntent, ProcessorError> {
        self.post_form("v1/payment_intents", &params.to_form(), idempotency_key, &[])
            .await
    }

    async fn retrieve_payment_intent(
        &self,
        id: &PaymentIntentId,
    ) -> Result<PaymentIntent, ProcessorError> {
        self.get_json(&format!("v1/payment_intents/{id}"), &[]).await
    }
}

#[async_trait]
impl CardSetupApi for HttpProcessorClient {
    async fn create_setup_intent(
        &self,
        customer: &CustomerId,
    ) -> Result<SetupIntent, ProcessorError> {
        let form = vec![("customer".to_string(), customer.to_string())];
        self.post_form("v1/setup_intents", &form, None, &[]).await
    }

    async fn create_ephemeral_key(
        &self,
        customer: &CustomerId,
        api_version: &str,
    ) -> Result<EphemeralKey, ProcessorError> {
        let form = vec![("customer".to_string(), customer.to_string())];
        self.post_form(
            "v1/ephemeral_keys",
            &form,
            None,
            &[(VERSION_HEADER, api_version)],
        )
        .await
    }

    async fn list_payment_methods(
        &self,
        customer: &CustomerId,
    ) -> Result<Vec<PaymentMethod>, ProcessorError> {
        let page: ListPage<PaymentMethod> = self
            .get_json(&format!("v1/customers/{customer}/payment_methods"), &[])
            .await?;
        Ok(page.data)
    }

    async fn detach_payment_method(
        &self,
        id: &PaymentMethodId,
    ) -> Result<PaymentMethod, ProcessorError> {
        self.post_form(&format!("v1/payment_methods/{id}/detach"), &[], None, &[])
            .await
    }
}

#[async_trait]
impl ConnectedAccountApi for HttpProcessorClient {
    async fn create_account(
        &self,
        params: &CreateAccountParams,
        idempotency_key: Option<&str>,
    ) -> Result<Account, ProcessorError> {
        self.post_form("v1/accounts", &params.to_form(), idempotency_key, &[])
            .await
    }

    async fn update_account(
        &self,
        id: &AccountId,
        params: &UpdateAccountParams,
    ) -> Result<Account, ProcessorError> {
        self.post_form(&format!("v1/accounts/{id}"), &params.to_form(), None, &[])
            .await
    }

    async fn retrieve_account(&self, id: &AccountId) -> Result<Account, ProcessorError> {
        self.get_json(&format!("v1/accounts/{id}"), &[]).await
    }

    async fn delete_account(&self, id: &AccountId) -> Result<DeletedAccount, ProcessorError> {
        self.delete_json(&format!("v1/accounts/{id}")).await
    }

    async fn list_accounts(&self, limit: u16) -> Result<Vec<Account>, ProcessorError> {
        let page: ListPage<Account> = self
            .get_json("v1/accounts", &[("limit", limit.to_string())])
            .await?;
        Ok(page.data)
    }

    async fn add_external_account(
        &self,
        id: &AccountId,
        token: &str,
    ) -> Result<ExternalAccount, ProcessorError> {
        let form = vec![("external_account".to_string(), token.to_string())];
        self.post_form(&format!("v1/accounts/{id}/external_accounts"), &form, None, &[])
            .await
    }

    async fn create_bank_account_token(
        &self,
        bank: &BankAccountParams,
    ) -> Result<BankToken, ProcessorError> {
        self.post_form("v1/tokens", &bank.to_form(), None, &[]).await
    }
}

#[async_trait]
impl TerminalApi for HttpProcessorClient {
    async fn create_connection_token(&self) -> Result<ConnectionToken, ProcessorError> {
        self.post_form("v1/terminal/connection_tokens", &[], None, &[])
            .await
    }

    async fn list_readers(&self, limit: u16) -> Result<Vec<TerminalReader>, ProcessorError> {
        let page: ListPage<TerminalReader> = self
            .get_json("v1/terminal/readers", &[("limit", limit.to_string())])
            .await?;
        Ok(page.data)
    }

    async fn retrieve_reader(&self, id: &ReaderId) -> Result<TerminalReader, ProcessorError> {
        self.get_json(&format!("v1/terminal/readers/{id}"), &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_structured_error_bodies() {
        let body = r#"{"error": {"message": "No such account: acct_x", "code": "resource_missing"}}"#;
        let (message, code) = parse_error_body(body);
        assert_eq!(message, "No such account: acct_x");
        assert_eq!(code.as_deref(), Some("resource_missing"));
    }

    #[test]
    fn falls_back_to_raw_body_on_unstructured_errors() {
        let (message, code) = parse_error_body("upstream gateway exploded");
        assert_eq!(message, "upstream gateway exploded");
        assert!(code.is_none());
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let client =
            HttpProcessorClient::new(ProcessorConfig::new("https://api.example.com/", "sk_test"))
                .unwrap();
        assert_eq!(client.url("v1/customers"), "https://api.example.com/v1/customers");
    }

    #[test]
    fn rejects_secret_keys_with_invalid_header_characters() {
        let result = HttpProcessorClient::new(ProcessorConfig::new("https://x", "bad\nkey"));
        assert!(matches!(result, Err(ProcessorError::Config(_))));
    }

    #[tokio::test]
    async fn unreachable_processor_surfaces_transport_error() {
        let client = HttpProcessorClient::new(
            ProcessorConfig::new("http://127.0.0.1:1", "sk_test").with_timeout_secs(1),
        )
        .unwrap();
        let err = client
            .retrieve_account(&AccountId::new("acct_1").unwrap())
            .await
            .unwrap_err();
        assert!(err.is_transient(), "expected transport/timeout, got {err:?}");
    }
}
