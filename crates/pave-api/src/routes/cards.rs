// SPDX-License-Identifier: Apache-2.0
//! # Card Endpoints
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `POST` | `/v1/cards/setup` | `begin_card_setup` |
//! | `GET` | `/v1/customers/:customer_id/payment-methods` | `list_payment_methods` |
//! | `DELETE` | `/v1/payment-methods/:payment_method_id` | `detach_payment_method` |

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use pave_core::ids::{CustomerId, PaymentMethodId};

use crate::error::ApiError;
use crate::state::AppState;
use crate::validate::{path_field, validated, Issues};

/// Request to begin card setup for a payer.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CardSetupRequest {
    pub email: String,
}

/// The credential bundle handed to the client-side SDK.
#[derive(Debug, Serialize, ToSchema)]
pub struct CardSetupResponse {
    pub setup_intent_client_secret: String,
    pub customer_id: String,
    pub ephemeral_key_secret: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentMethodListResponse {
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Build the cards router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/cards/setup", post(begin_card_setup))
        .route(
            "/v1/customers/:customer_id/payment-methods",
            get(list_payment_methods),
        )
        .route(
            "/v1/payment-methods/:payment_method_id",
            delete(detach_payment_method),
        )
}

/// POST /v1/cards/setup — issue setup-intent and ephemeral credentials.
#[utoipa::path(
    post,
    path = "/v1/cards/setup",
    request_body = CardSetupRequest,
    responses(
        (status = 200, description = "Credentials issued", body = CardSetupResponse),
        (status = 502, description = "Processor failure", body = crate::error::ErrorBody),
    ),
    tag = "cards"
)]
pub(crate) async fn begin_card_setup(
    State(state): State<AppState>,
    Json(req): Json<CardSetupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut issues = Issues::new();
    let email = issues.email("email", &req.email);
    issues.finish()?;

    let credentials = state
        .cards
        .begin_card_setup(&validated("email", email)?)
        .await?;
    Ok(Json(CardSetupResponse {
        setup_intent_client_secret: credentials.setup_intent_client_secret,
        customer_id: credentials.customer_id.into_inner(),
        ephemeral_key_secret: credentials.ephemeral_key_secret,
    }))
}

/// GET /v1/customers/:customer_id/payment-methods — saved methods.
#[utoipa::path(
    get,
    path = "/v1/customers/{customer_id}/payment-methods",
    params(("customer_id" = String, Path, description = "Customer id")),
    responses((status = 200, description = "Saved payment methods", body = PaymentMethodListResponse)),
    tag = "cards"
)]
pub(crate) async fn list_payment_methods(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let customer_id = path_field("customer_id", CustomerId::new(customer_id))?;
    let methods = state.processor.list_payment_methods(&customer_id).await?;
    let data = methods
        .iter()
        .map(|m| serde_json::to_value(m).map_err(|e| ApiError::Internal(e.to_string())))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(PaymentMethodListResponse { data }))
}

/// DELETE /v1/payment-methods/:payment_method_id — detach a card.
#[utoipa::path(
    delete,
    path = "/v1/payment-methods/{payment_method_id}",
    params(("payment_method_id" = String, Path, description = "Payment method id")),
    responses(
        (status = 200, description = "Method detached", body = MessageResponse),
        (status = 502, description = "Processor failure", body = crate::error::ErrorBody),
    ),
    tag = "cards"
)]
pub(crate) async fn detach_payment_method(
    State(state): State<AppState>,
    Path(payment_method_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let payment_method_id =
        path_field("payment_method_id", PaymentMethodId::new(payment_method_id))?;
    state.processor.detach_payment_method(&payment_method_id).await?;
    Ok(Json(MessageResponse {
        message: "Payment method removed successfully".to_string(),
    }))
}
