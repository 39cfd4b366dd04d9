// SPDX-License-Identifier: Apache-2.0
//! # pave-api — HTTP Surface for the Pave Stack
//!
//! Thin Axum layer over `pave-flows`: deserialize → validate → invoke
//! one flow operation → shape JSON. The interesting failure modes live
//! in the flows; this crate only maps them to status codes (see
//! [`error`]) and rejects malformed input with field-level issues before
//! any flow runs (see [`validate`]).
//!
//! ## API Surface
//!
//! | Prefix | Module | Domain |
//! |---|---|---|
//! | `/v1/accounts/*` | [`routes::accounts`] | Connected-account lifecycle |
//! | `/v1/checkout/*` | [`routes::checkout`] | Direct & marketplace checkout |
//! | `/v1/cards/*`, `/v1/customers/*`, `/v1/payment-methods/*` | [`routes::cards`] | Card setup & saved methods |
//! | `/v1/payment-intents/*` | [`routes::payment_intents`] | Intent retrieval |
//! | `/v1/terminal/*` | [`routes::terminal`] | Card-present operations |
//!
//! `/health` and `/openapi.json` are mounted at the root.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod validate;

use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub use config::ApiConfig;
pub use state::AppState;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::accounts::router())
        .merge(routes::checkout::router())
        .merge(routes::cards::router())
        .merge(routes::payment_intents::router())
        .merge(routes::terminal::router())
        .route("/openapi.json", get(openapi_json))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::ApiDoc::openapi())
}
