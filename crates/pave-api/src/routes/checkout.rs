// SPDX-License-Identifier: Apache-2.0
//! # Checkout Endpoints
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `POST` | `/v1/checkout` | `direct_checkout` |
//! | `POST` | `/v1/checkout/marketplace` | `marketplace_checkout` |

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use pave_core::money::{Currency, MinorUnits};
use pave_core::profile::EmailAddress;
use pave_flows::CheckoutSession;

use crate::error::ApiError;
use crate::state::AppState;
use crate::validate::{validated, Issues};

/// Request to start a checkout.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CheckoutRequest {
    pub email: String,
    /// Charge amount in minor units of `currency`.
    pub amount: MinorUnits,
    pub currency: String,
}

impl CheckoutRequest {
    fn validate(&self) -> Result<(EmailAddress, MinorUnits, Currency), ApiError> {
        let mut issues = Issues::new();
        let email = issues.email("email", &self.email);
        let amount = issues.positive_amount("amount", self.amount);
        let currency = issues.currency("currency", &self.currency);
        issues.finish()?;
        Ok((
            validated("email", email)?,
            validated("amount", amount)?,
            validated("currency", currency)?,
        ))
    }
}

/// What the client needs to confirm the payment.
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub payment_intent_id: String,
    pub client_secret: String,
}

impl From<CheckoutSession> for CheckoutResponse {
    fn from(session: CheckoutSession) -> Self {
        Self {
            payment_intent_id: session.payment_intent_id.into_inner(),
            client_secret: session.client_secret,
        }
    }
}

/// Build the checkout router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/checkout", post(direct_checkout))
        .route("/v1/checkout/marketplace", post(marketplace_checkout))
}

/// POST /v1/checkout — charge the payer directly, no destination.
#[utoipa::path(
    post,
    path = "/v1/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Checkout session created", body = CheckoutResponse),
        (status = 422, description = "Malformed fields", body = crate::error::ErrorBody),
        (status = 502, description = "Processor rejected the intent", body = crate::error::ErrorBody),
    ),
    tag = "checkout"
)]
pub(crate) async fn direct_checkout(
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (email, amount, currency) = req.validate()?;
    let session = state.payments.direct_checkout(&email, amount, currency).await?;
    Ok(Json(CheckoutResponse::from(session)))
}

/// POST /v1/checkout/marketplace — destination charge with fee split.
#[utoipa::path(
    post,
    path = "/v1/checkout/marketplace",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Checkout session created", body = CheckoutResponse),
        (status = 404, description = "No destination account for this email", body = crate::error::ErrorBody),
        (status = 502, description = "Processor rejected the intent", body = crate::error::ErrorBody),
    ),
    tag = "checkout"
)]
pub(crate) async fn marketplace_checkout(
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (email, amount, currency) = req.validate()?;
    let session = state
        .payments
        .marketplace_checkout(&email, amount, currency)
        .await?;
    Ok(Json(CheckoutResponse::from(session)))
}
