// SPDX-License-Identifier: Apache-2.0
//! Router-level tests: the full application assembled over the mock
//! processor and an in-memory ledger, driven through `tower::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

use pave_api::state::AppState;
use pave_core::fees::SplitPercentFeePolicy;
use pave_core::profile::OnboardingDefaults;
use pave_ledger::AccountLedger;
use pave_processor::mock::MockProcessor;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn test_app() -> (axum::Router, Arc<MockProcessor>) {
    let mock = Arc::new(MockProcessor::new());
    let ledger = AccountLedger::in_memory().await.unwrap();
    let state = AppState::new(
        ledger,
        mock.clone(),
        Arc::new(SplitPercentFeePolicy::default()),
        OnboardingDefaults::default(),
    );
    (pave_api::app(state), mock)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn merchant_details(email: &str) -> serde_json::Value {
    json!({
        "email": email,
        "country": "DE",
        "business_name": "Rosen Flowers",
        "url": "https://rosen.example.com",
        "address_line1": "Blumenstr. 1",
        "city": "Berlin",
        "state": "BE",
        "postal_code": "10115",
        "phone": "+4915123456789",
        "product_description": "Fresh flowers",
        "support_url": "https://rosen.example.com/support",
        "mcc": "5992",
        "first_name": "Jenny",
        "last_name": "Rosen"
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_endpoint_answers() {
    let (app, _mock) = test_app().await;
    let resp = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "ok");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (app, _mock) = test_app().await;
    let resp = app.oneshot(get("/openapi.json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let doc = body_json(resp).await;
    assert!(doc["paths"]["/v1/accounts"].is_object());
}

#[tokio::test]
async fn onboarding_then_retrieval_round_trips_the_profile() {
    let (app, _mock) = test_app().await;

    let resp = app
        .clone()
        .oneshot(post("/v1/accounts", merchant_details("m@example.com")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    let account_id = created["account_id"].as_str().unwrap().to_string();
    assert!(!account_id.is_empty());

    let resp = app
        .oneshot(post("/v1/accounts/retrieve", json!({ "email": "m@example.com" })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let snapshot = body_json(resp).await;
    assert_eq!(snapshot["account"]["id"], account_id.as_str());
    assert_eq!(snapshot["account"]["business_profile"]["name"], "Rosen Flowers");
    assert_eq!(snapshot["account"]["business_profile"]["mcc"], "5992");
    assert_eq!(
        snapshot["account"]["company"]["address"]["postal_code"],
        "10115"
    );
}

#[tokio::test]
async fn malformed_onboarding_reports_every_bad_field() {
    let (app, mock) = test_app().await;

    let mut details = merchant_details("not-an-email");
    details["url"] = json!("rosen.example.com");
    details["mcc"] = json!("");

    let resp = app.oneshot(post("/v1/accounts", details)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|issue| issue["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"url"));
    assert!(fields.contains(&"mcc"));

    // Validation rejects before any flow runs.
    assert_eq!(mock.calls("create_account"), 0);
}

#[tokio::test]
async fn marketplace_checkout_charges_the_reference_fee() {
    let (app, mock) = test_app().await;

    let resp = app
        .clone()
        .oneshot(post("/v1/accounts", merchant_details("m@example.com")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .oneshot(post(
            "/v1/checkout/marketplace",
            json!({ "email": "m@example.com", "amount": 20000, "currency": "eur" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let session = body_json(resp).await;
    assert!(session["client_secret"].as_str().unwrap().contains("secret"));

    let intents = mock.payment_intents();
    assert_eq!(intents.len(), 1);
    assert_eq!(intents[0].application_fee_amount, Some(800));
}

#[tokio::test]
async fn marketplace_checkout_for_unknown_merchant_is_404() {
    let (app, mock) = test_app().await;

    let resp = app
        .oneshot(post(
            "/v1/checkout/marketplace",
            json!({ "email": "stranger@example.com", "amount": 20000, "currency": "eur" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["error"]["code"], "NOT_FOUND");
    assert!(mock.payment_intents().is_empty());
}

#[tokio::test]
async fn update_details_for_unknown_merchant_is_404_without_remote_call() {
    let (app, mock) = test_app().await;

    let resp = app
        .oneshot(post("/v1/accounts/details", merchant_details("ghost@example.com")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(mock.calls("update_account"), 0);
}

#[tokio::test]
async fn processor_rejection_surfaces_verbatim_as_upstream_error() {
    let (app, mock) = test_app().await;
    mock.inject_failure("create_payment_intent", 1);

    let resp = app
        .oneshot(post(
            "/v1/checkout",
            json!({ "email": "payer@example.com", "amount": 5000, "currency": "inr" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("injected failure"));
}

#[tokio::test]
async fn card_setup_issues_all_credentials() {
    let (app, _mock) = test_app().await;

    let resp = app
        .oneshot(post("/v1/cards/setup", json!({ "email": "payer@example.com" })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body["setup_intent_client_secret"].as_str().unwrap().contains("secret"));
    assert!(body["customer_id"].as_str().unwrap().starts_with("cus_"));
    assert!(!body["ephemeral_key_secret"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn terminal_intent_defaults_to_card_present_manual_capture() {
    let (app, _mock) = test_app().await;

    let resp = app
        .oneshot(post("/v1/terminal/payment-intents", json!({ "amount": 5000 })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["payment_intent"]["capture_method"], "manual");
    assert_eq!(body["payment_intent"]["payment_method_types"][0], "card_present");
}

#[tokio::test]
async fn detach_payment_method_round_trip() {
    let (app, mock) = test_app().await;
    let customer = pave_core::ids::CustomerId::new("cus_seeded").unwrap();
    mock.seed_payment_method("pm_1", &customer);

    let resp = app
        .clone()
        .oneshot(get("/v1/customers/cus_seeded/payment-methods"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"].as_array().unwrap().len(), 1);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/v1/payment-methods/pm_1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(get("/v1/customers/cus_seeded/payment-methods"))
        .await
        .unwrap();
    assert!(body_json(resp).await["data"].as_array().unwrap().is_empty());
}
