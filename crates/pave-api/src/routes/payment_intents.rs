// SPDX-License-Identifier: Apache-2.0
//! # Payment-Intent Endpoints
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `GET` | `/v1/payment-intents/:payment_intent_id` | `retrieve_payment_intent` |

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use pave_core::ids::PaymentIntentId;

use crate::error::ApiError;
use crate::state::AppState;
use crate::validate::path_field;

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentIntentResponse {
    /// The processor's payment-intent object, passed through.
    #[schema(value_type = Object)]
    pub payment_intent: serde_json::Value,
}

/// Build the payment-intent router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/v1/payment-intents/:payment_intent_id",
        get(retrieve_payment_intent),
    )
}

/// GET /v1/payment-intents/:payment_intent_id — current intent state.
#[utoipa::path(
    get,
    path = "/v1/payment-intents/{payment_intent_id}",
    params(("payment_intent_id" = String, Path, description = "Payment intent id")),
    responses(
        (status = 200, description = "Payment intent", body = PaymentIntentResponse),
        (status = 502, description = "Processor failure", body = crate::error::ErrorBody),
    ),
    tag = "payment-intents"
)]
pub(crate) async fn retrieve_payment_intent(
    State(state): State<AppState>,
    Path(payment_intent_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let payment_intent_id =
        path_field("payment_intent_id", PaymentIntentId::new(payment_intent_id))?;
    let intent = state
        .processor
        .retrieve_payment_intent(&payment_intent_id)
        .await?;
    Ok(Json(PaymentIntentResponse {
        payment_intent: serde_json::to_value(&intent)
            .map_err(|e| ApiError::Internal(e.to_string()))?,
    }))
}
