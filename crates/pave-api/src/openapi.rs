// SPDX-License-Identifier: Apache-2.0
//! OpenAPI document aggregation, served at `/openapi.json`.

use utoipa::OpenApi;

/// The aggregated OpenAPI 3 document for the Pave API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pave API",
        description = "Marketplace payment orchestration: connected-account lifecycle, checkout flows with fee splits, card setup, and terminal operations."
    ),
    paths(
        crate::routes::accounts::create_account,
        crate::routes::accounts::list_accounts,
        crate::routes::accounts::retrieve_account,
        crate::routes::accounts::update_account_details,
        crate::routes::accounts::delete_account,
        crate::routes::accounts::rebind_account,
        crate::routes::accounts::add_external_account,
        crate::routes::accounts::attach_bank_account,
        crate::routes::checkout::direct_checkout,
        crate::routes::checkout::marketplace_checkout,
        crate::routes::cards::begin_card_setup,
        crate::routes::cards::list_payment_methods,
        crate::routes::cards::detach_payment_method,
        crate::routes::payment_intents::retrieve_payment_intent,
        crate::routes::terminal::create_terminal_intent,
        crate::routes::terminal::create_connection_token,
        crate::routes::terminal::list_readers,
        crate::routes::terminal::retrieve_reader,
    ),
    components(schemas(
        crate::routes::accounts::AccountDetailsRequest,
        crate::routes::accounts::AccountEmailRequest,
        crate::routes::accounts::RebindAccountRequest,
        crate::routes::accounts::ExternalAccountRequest,
        crate::routes::accounts::BankTokenRequest,
        crate::routes::accounts::CreateAccountResponse,
        crate::routes::accounts::AccountSnapshotResponse,
        crate::routes::accounts::AccountListResponse,
        crate::routes::accounts::DeleteAccountResponse,
        crate::routes::accounts::RebindAccountResponse,
        crate::routes::accounts::ExternalAccountResponse,
        crate::routes::checkout::CheckoutRequest,
        crate::routes::checkout::CheckoutResponse,
        crate::routes::cards::CardSetupRequest,
        crate::routes::cards::CardSetupResponse,
        crate::routes::cards::PaymentMethodListResponse,
        crate::routes::cards::MessageResponse,
        crate::routes::payment_intents::PaymentIntentResponse,
        crate::routes::terminal::TerminalIntentRequest,
        crate::routes::terminal::TerminalIntentResponse,
        crate::routes::terminal::ConnectionTokenResponse,
        crate::routes::terminal::ReaderListResponse,
        crate::routes::terminal::ReaderResponse,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::validate::FieldIssue,
    )),
    tags(
        (name = "accounts", description = "Connected-account lifecycle and payout instruments"),
        (name = "checkout", description = "Direct and marketplace checkout flows"),
        (name = "cards", description = "Card setup and saved payment methods"),
        (name = "payment-intents", description = "Payment-intent retrieval"),
        (name = "terminal", description = "Card-present readers and connection tokens"),
    )
)]
pub struct ApiDoc;
