// SPDX-License-Identifier: Apache-2.0
//! # Connected-Account Endpoints
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `POST` | `/v1/accounts` | `create_account` |
//! | `GET` | `/v1/accounts` | `list_accounts` |
//! | `DELETE` | `/v1/accounts` | `delete_account` |
//! | `POST` | `/v1/accounts/retrieve` | `retrieve_account` |
//! | `POST` | `/v1/accounts/details` | `update_account_details` |
//! | `POST` | `/v1/accounts/rebind` | `rebind_account` |
//! | `POST` | `/v1/accounts/external-account` | `add_external_account` |
//! | `POST` | `/v1/accounts/bank-token` | `attach_bank_account` |

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use pave_core::ids::AccountId;
use pave_core::money::Currency;
use pave_core::profile::{Address, BusinessProfile, MerchantProfile, PersonName};
use pave_processor::types::BankAccountParams;

use crate::error::ApiError;
use crate::state::AppState;
use crate::validate::{path_field, validated, Issues};

/// Default page size for account listings.
const DEFAULT_LIST_LIMIT: u16 = 10;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Full merchant detail bundle, shared by create and detail update.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AccountDetailsRequest {
    pub email: String,
    pub country: String,
    pub business_name: String,
    pub url: String,
    pub address_line1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub phone: String,
    pub product_description: String,
    pub support_url: String,
    pub mcc: String,
    pub first_name: String,
    pub last_name: String,
}

impl AccountDetailsRequest {
    /// Validate every field, reporting all failures at once.
    fn into_profile(self) -> Result<MerchantProfile, ApiError> {
        let mut issues = Issues::new();
        let email = issues.email("email", &self.email);
        let country = issues.non_empty("country", &self.country);
        let business_name = issues.non_empty("business_name", &self.business_name);
        let url = issues.url("url", &self.url);
        let address_line1 = issues.non_empty("address_line1", &self.address_line1);
        let city = issues.non_empty("city", &self.city);
        let state = issues.non_empty("state", &self.state);
        let postal_code = issues.non_empty("postal_code", &self.postal_code);
        let phone = issues.non_empty("phone", &self.phone);
        let product_description =
            issues.non_empty("product_description", &self.product_description);
        let support_url = issues.url("support_url", &self.support_url);
        let mcc = issues.non_empty("mcc", &self.mcc);
        let first_name = issues.non_empty("first_name", &self.first_name);
        let last_name = issues.non_empty("last_name", &self.last_name);
        issues.finish()?;

        Ok(MerchantProfile {
            email: validated("email", email)?,
            person: PersonName {
                first_name: validated("first_name", first_name)?,
                last_name: validated("last_name", last_name)?,
            },
            phone: validated("phone", phone)?,
            business: BusinessProfile {
                name: validated("business_name", business_name)?,
                url: validated("url", url)?,
                product_description: validated("product_description", product_description)?,
                support_url: validated("support_url", support_url)?,
                mcc: validated("mcc", mcc)?,
            },
            address: Address {
                line1: validated("address_line1", address_line1)?,
                city: validated("city", city)?,
                state: validated("state", state)?,
                postal_code: validated("postal_code", postal_code)?,
                country: validated("country", country)?,
            },
        })
    }
}

/// Request carrying only a merchant email.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AccountEmailRequest {
    pub email: String,
}

/// Administrative rebind of an email to a different account id.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RebindAccountRequest {
    pub email: String,
    pub account_id: String,
}

/// Attach an external-account token to a connected account.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ExternalAccountRequest {
    pub account_id: String,
    /// Tokenized payout instrument; omitted means the documented
    /// test-mode default token.
    #[serde(default)]
    pub token: Option<String>,
}

/// Tokenize raw bank details and attach them as the payout instrument.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct BankTokenRequest {
    pub account_id: String,
    pub country: String,
    pub currency: String,
    pub account_holder_name: String,
    pub account_holder_type: String,
    pub account_number: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListAccountsQuery {
    #[serde(default)]
    pub limit: Option<u16>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateAccountResponse {
    pub account_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountSnapshotResponse {
    /// The processor's account object, passed through.
    #[schema(value_type = Object)]
    pub account: serde_json::Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountListResponse {
    #[schema(value_type = Vec<Object>)]
    pub accounts: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteAccountResponse {
    pub account_id: String,
    pub deleted: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RebindAccountResponse {
    pub affected: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExternalAccountResponse {
    pub external_account_id: String,
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Internal(e.to_string()))
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the connected-account router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/accounts",
            post(create_account).get(list_accounts).delete(delete_account),
        )
        .route("/v1/accounts/retrieve", post(retrieve_account))
        .route("/v1/accounts/details", post(update_account_details))
        .route("/v1/accounts/rebind", post(rebind_account))
        .route("/v1/accounts/external-account", post(add_external_account))
        .route("/v1/accounts/bank-token", post(attach_bank_account))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/accounts — onboard a merchant as a connected account.
#[utoipa::path(
    post,
    path = "/v1/accounts",
    request_body = AccountDetailsRequest,
    responses(
        (status = 201, description = "Account created and bound in the ledger", body = CreateAccountResponse),
        (status = 422, description = "Malformed fields", body = crate::error::ErrorBody),
        (status = 502, description = "Processor rejected the creation", body = crate::error::ErrorBody),
    ),
    tag = "accounts"
)]
pub(crate) async fn create_account(
    State(state): State<AppState>,
    Json(req): Json<AccountDetailsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = req.into_profile()?;
    let account_id = state.lifecycle.create(profile).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateAccountResponse {
            account_id: account_id.into_inner(),
        }),
    ))
}

/// GET /v1/accounts — list connected accounts.
#[utoipa::path(
    get,
    path = "/v1/accounts",
    params(("limit" = Option<u16>, Query, description = "Page size, default 10")),
    responses((status = 200, description = "Account list", body = AccountListResponse)),
    tag = "accounts"
)]
pub(crate) async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<ListAccountsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let accounts = state
        .lifecycle
        .list_all(query.limit.unwrap_or(DEFAULT_LIST_LIMIT))
        .await?;
    let accounts = accounts
        .iter()
        .map(to_json)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(AccountListResponse { accounts }))
}

/// POST /v1/accounts/retrieve — fetch the account snapshot for an email.
#[utoipa::path(
    post,
    path = "/v1/accounts/retrieve",
    request_body = AccountEmailRequest,
    responses(
        (status = 200, description = "Account snapshot", body = AccountSnapshotResponse),
        (status = 404, description = "Email has no ledger binding", body = crate::error::ErrorBody),
    ),
    tag = "accounts"
)]
pub(crate) async fn retrieve_account(
    State(state): State<AppState>,
    Json(req): Json<AccountEmailRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut issues = Issues::new();
    let email = issues.email("email", &req.email);
    issues.finish()?;

    let account = state.lifecycle.retrieve(&validated("email", email)?).await?;
    Ok(Json(AccountSnapshotResponse {
        account: to_json(&account)?,
    }))
}

/// POST /v1/accounts/details — update the merchant's details.
#[utoipa::path(
    post,
    path = "/v1/accounts/details",
    request_body = AccountDetailsRequest,
    responses(
        (status = 200, description = "Updated account snapshot", body = AccountSnapshotResponse),
        (status = 404, description = "Email has no ledger binding", body = crate::error::ErrorBody),
    ),
    tag = "accounts"
)]
pub(crate) async fn update_account_details(
    State(state): State<AppState>,
    Json(req): Json<AccountDetailsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = req.into_profile()?;
    let email = profile.email.clone();
    let account = state.lifecycle.update_details(&email, profile).await?;
    Ok(Json(AccountSnapshotResponse {
        account: to_json(&account)?,
    }))
}

/// DELETE /v1/accounts — delete the merchant's remote account.
///
/// The ledger row is intentionally kept; see the lifecycle docs.
#[utoipa::path(
    delete,
    path = "/v1/accounts",
    request_body = AccountEmailRequest,
    responses(
        (status = 200, description = "Deletion confirmation", body = DeleteAccountResponse),
        (status = 404, description = "Email has no ledger binding", body = crate::error::ErrorBody),
    ),
    tag = "accounts"
)]
pub(crate) async fn delete_account(
    State(state): State<AppState>,
    Json(req): Json<AccountEmailRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut issues = Issues::new();
    let email = issues.email("email", &req.email);
    issues.finish()?;

    let confirmation = state.lifecycle.delete(&validated("email", email)?).await?;
    Ok(Json(DeleteAccountResponse {
        account_id: confirmation.id.into_inner(),
        deleted: confirmation.deleted,
    }))
}

/// POST /v1/accounts/rebind — administratively rebind an email.
#[utoipa::path(
    post,
    path = "/v1/accounts/rebind",
    request_body = RebindAccountRequest,
    responses(
        (status = 200, description = "Rebind applied", body = RebindAccountResponse),
        (status = 404, description = "Email has no ledger row", body = crate::error::ErrorBody),
    ),
    tag = "accounts"
)]
pub(crate) async fn rebind_account(
    State(state): State<AppState>,
    Json(req): Json<RebindAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut issues = Issues::new();
    let email = issues.email("email", &req.email);
    issues.finish()?;
    let account_id = path_field("account_id", AccountId::new(req.account_id))?;

    let affected = state
        .lifecycle
        .rebind(&validated("email", email)?, &account_id)
        .await?;
    Ok(Json(RebindAccountResponse { affected }))
}

/// POST /v1/accounts/external-account — attach a payout token.
#[utoipa::path(
    post,
    path = "/v1/accounts/external-account",
    request_body = ExternalAccountRequest,
    responses(
        (status = 200, description = "External account attached", body = ExternalAccountResponse),
    ),
    tag = "accounts"
)]
pub(crate) async fn add_external_account(
    State(state): State<AppState>,
    Json(req): Json<ExternalAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account_id = path_field("account_id", AccountId::new(req.account_id))?;
    let external = state
        .lifecycle
        .add_external_account(&account_id, req.token.as_deref())
        .await?;
    Ok(Json(ExternalAccountResponse {
        external_account_id: external.id,
    }))
}

/// POST /v1/accounts/bank-token — tokenize bank details and attach them.
#[utoipa::path(
    post,
    path = "/v1/accounts/bank-token",
    request_body = BankTokenRequest,
    responses(
        (status = 200, description = "Bank account tokenized and attached", body = ExternalAccountResponse),
    ),
    tag = "accounts"
)]
pub(crate) async fn attach_bank_account(
    State(state): State<AppState>,
    Json(req): Json<BankTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut issues = Issues::new();
    let currency = issues.currency("currency", &req.currency);
    let country = issues.non_empty("country", &req.country);
    let holder_name = issues.non_empty("account_holder_name", &req.account_holder_name);
    let holder_type = issues.non_empty("account_holder_type", &req.account_holder_type);
    let account_number = issues.non_empty("account_number", &req.account_number);
    issues.finish()?;
    let account_id = path_field("account_id", AccountId::new(req.account_id))?;

    let bank = BankAccountParams {
        country: validated("country", country)?,
        currency: validated::<Currency>("currency", currency)?,
        account_holder_name: validated("account_holder_name", holder_name)?,
        account_holder_type: validated("account_holder_type", holder_type)?,
        account_number: validated("account_number", account_number)?,
    };

    let external = state
        .lifecycle
        .attach_bank_account(&account_id, bank)
        .await?;
    Ok(Json(ExternalAccountResponse {
        external_account_id: external.id,
    }))
}
