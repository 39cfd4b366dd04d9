// SPDX-License-Identifier: Apache-2.0
//! # Terminal (Card-Present) Endpoints
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `POST` | `/v1/terminal/payment-intents` | `create_terminal_intent` |
//! | `GET` | `/v1/terminal/connection-token` | `create_connection_token` |
//! | `GET` | `/v1/terminal/readers` | `list_readers` |
//! | `GET` | `/v1/terminal/readers/:reader_id` | `retrieve_reader` |

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use pave_core::ids::ReaderId;
use pave_core::money::MinorUnits;

use crate::error::ApiError;
use crate::state::AppState;
use crate::validate::{path_field, validated, Issues};

/// Default page size for reader listings.
const DEFAULT_READER_LIMIT: u16 = 100;

/// Currency used when a terminal request does not name one.
const DEFAULT_TERMINAL_CURRENCY: &str = "eur";

/// Request for a card-present payment intent.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct TerminalIntentRequest {
    /// Charge amount in minor units.
    pub amount: MinorUnits,
    /// Defaults to the platform's terminal currency when omitted.
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListReadersQuery {
    #[serde(default)]
    pub limit: Option<u16>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TerminalIntentResponse {
    /// The processor's payment-intent object, passed through.
    #[schema(value_type = Object)]
    pub payment_intent: serde_json::Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectionTokenResponse {
    pub secret: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReaderListResponse {
    #[schema(value_type = Vec<Object>)]
    pub readers: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReaderResponse {
    /// The processor's reader object, passed through.
    #[schema(value_type = Object)]
    pub reader: serde_json::Value,
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Internal(e.to_string()))
}

/// Build the terminal router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/terminal/payment-intents", post(create_terminal_intent))
        .route("/v1/terminal/connection-token", get(create_connection_token))
        .route("/v1/terminal/readers", get(list_readers))
        .route("/v1/terminal/readers/:reader_id", get(retrieve_reader))
}

/// POST /v1/terminal/payment-intents — card-present intent, manual capture.
#[utoipa::path(
    post,
    path = "/v1/terminal/payment-intents",
    request_body = TerminalIntentRequest,
    responses(
        (status = 200, description = "Card-present intent created", body = TerminalIntentResponse),
        (status = 422, description = "Malformed fields", body = crate::error::ErrorBody),
    ),
    tag = "terminal"
)]
pub(crate) async fn create_terminal_intent(
    State(state): State<AppState>,
    Json(req): Json<TerminalIntentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut issues = Issues::new();
    let amount = issues.positive_amount("amount", req.amount);
    let currency = issues.currency(
        "currency",
        req.currency.as_deref().unwrap_or(DEFAULT_TERMINAL_CURRENCY),
    );
    issues.finish()?;

    let intent = state
        .payments
        .terminal_checkout(validated("amount", amount)?, validated("currency", currency)?)
        .await?;
    Ok(Json(TerminalIntentResponse {
        payment_intent: to_json(&intent)?,
    }))
}

/// GET /v1/terminal/connection-token — reader connection credential.
#[utoipa::path(
    get,
    path = "/v1/terminal/connection-token",
    responses((status = 200, description = "Connection token", body = ConnectionTokenResponse)),
    tag = "terminal"
)]
pub(crate) async fn create_connection_token(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let token = state.processor.create_connection_token().await?;
    Ok(Json(ConnectionTokenResponse {
        secret: token.secret,
    }))
}

/// GET /v1/terminal/readers — registered readers.
#[utoipa::path(
    get,
    path = "/v1/terminal/readers",
    params(("limit" = Option<u16>, Query, description = "Page size, default 100")),
    responses((status = 200, description = "Reader list", body = ReaderListResponse)),
    tag = "terminal"
)]
pub(crate) async fn list_readers(
    State(state): State<AppState>,
    Query(query): Query<ListReadersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let readers = state
        .processor
        .list_readers(query.limit.unwrap_or(DEFAULT_READER_LIMIT))
        .await?;
    let readers = readers
        .iter()
        .map(to_json)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(ReaderListResponse { readers }))
}

/// GET /v1/terminal/readers/:reader_id — one reader.
#[utoipa::path(
    get,
    path = "/v1/terminal/readers/{reader_id}",
    params(("reader_id" = String, Path, description = "Reader id")),
    responses(
        (status = 200, description = "Reader", body = ReaderResponse),
        (status = 502, description = "Processor failure", body = crate::error::ErrorBody),
    ),
    tag = "terminal"
)]
pub(crate) async fn retrieve_reader(
    State(state): State<AppState>,
    Path(reader_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let reader_id = path_field("reader_id", ReaderId::new(reader_id))?;
    let reader = state.processor.retrieve_reader(&reader_id).await?;
    Ok(Json(ReaderResponse {
        reader: to_json(&reader)?,
    }))
}
