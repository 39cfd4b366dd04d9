// SPDX-License-Identifier: Apache-2.0
//! # Processor Wire Types
//!
//! Inbound (response) objects and outbound (request) parameter bundles
//! for the processor's REST API. Responses are deserialized leniently —
//! unknown fields are ignored, optional fields default — because the
//! processor adds fields without notice. Outbound parameters encode to
//! the processor's form format with bracket-nested keys
//! (`transfer_data[destination]`, `individual[dob][day]`, …).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pave_core::ids::{
    AccountId, CustomerId, PaymentIntentId, PaymentMethodId, ReaderId, SetupIntentId,
};
use pave_core::money::{Currency, MinorUnits};
use pave_core::profile::{DateOfBirth, MerchantProfile, OnboardingDefaults};

/// A single form key/value pair in the processor's request encoding.
pub type FormPair = (String, String);

fn push(form: &mut Vec<FormPair>, key: impl Into<String>, value: impl ToString) {
    form.push((key.into(), value.to_string()));
}

// ---------------------------------------------------------------------------
// List envelope
// ---------------------------------------------------------------------------

/// The processor's list envelope: `{ "data": [...], "has_more": bool }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListPage<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

/// A customer record in the processor's directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    #[serde(default)]
    pub email: Option<String>,
}

// ---------------------------------------------------------------------------
// Payment intents
// ---------------------------------------------------------------------------

/// Destination-routing block on a payment intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferData {
    pub destination: AccountId,
}

/// A payment intent as returned by the processor. Its state machine is
/// owned entirely by the processor; Pave only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: PaymentIntentId,
    pub amount: MinorUnits,
    pub currency: Currency,
    #[serde(default)]
    pub status: Option<String>,
    /// Single-use client credential; present on create, absent on some
    /// retrievals depending on key type.
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub customer: Option<CustomerId>,
    #[serde(default)]
    pub application_fee_amount: Option<MinorUnits>,
    #[serde(default)]
    pub transfer_data: Option<TransferData>,
    #[serde(default)]
    pub payment_method_types: Vec<String>,
    #[serde(default)]
    pub capture_method: Option<String>,
}

/// Parameters for creating a payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentParams {
    pub amount: MinorUnits,
    pub currency: Currency,
    pub customer: Option<CustomerId>,
    /// Platform fee withheld from the destination account's transfer.
    pub application_fee_amount: Option<MinorUnits>,
    /// Destination connected account for marketplace charges.
    pub transfer_destination: Option<AccountId>,
    /// Non-default payment method types (e.g. `card_present`).
    pub payment_method_types: Vec<String>,
    /// `manual` for terminal flows that capture after authorization.
    pub capture_method: Option<String>,
}

impl PaymentIntentParams {
    /// A plain charge bound to a customer, no destination routing.
    pub fn direct(amount: MinorUnits, currency: Currency, customer: CustomerId) -> Self {
        Self {
            amount,
            currency,
            customer: Some(customer),
            application_fee_amount: None,
            transfer_destination: None,
            payment_method_types: Vec::new(),
            capture_method: None,
        }
    }

    /// A destination charge: funds route to `destination` minus the
    /// platform fee.
    pub fn destination_charge(
        amount: MinorUnits,
        currency: Currency,
        customer: CustomerId,
        destination: AccountId,
        platform_fee: MinorUnits,
    ) -> Self {
        Self {
            amount,
            currency,
            customer: Some(customer),
            application_fee_amount: Some(platform_fee),
            transfer_destination: Some(destination),
            payment_method_types: Vec::new(),
            capture_method: None,
        }
    }

    /// A card-present intent for terminal readers: `card_present` method
    /// type, manual capture after authorization.
    pub fn card_present(amount: MinorUnits, currency: Currency) -> Self {
        Self {
            amount,
            currency,
            customer: None,
            application_fee_amount: None,
            transfer_destination: None,
            payment_method_types: vec!["card_present".to_string()],
            capture_method: Some("manual".to_string()),
        }
    }

    /// Encode to the processor's form representation.
    pub fn to_form(&self) -> Vec<FormPair> {
        let mut form = Vec::new();
        push(&mut form, "amount", self.amount);
        push(&mut form, "currency", self.currency.as_str());
        if let Some(customer) = &self.customer {
            push(&mut form, "customer", customer);
        }
        if let Some(fee) = self.application_fee_amount {
            push(&mut form, "application_fee_amount", fee);
        }
        if let Some(destination) = &self.transfer_destination {
            push(&mut form, "transfer_data[destination]", destination);
        }
        for method_type in &self.payment_method_types {
            push(&mut form, "payment_method_types[]", method_type);
        }
        if let Some(capture) = &self.capture_method {
            push(&mut form, "capture_method", capture);
        }
        form
    }
}

// ---------------------------------------------------------------------------
// Card setup
// ---------------------------------------------------------------------------

/// A setup intent: the intent to attach a payment method without charging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupIntent {
    pub id: SetupIntentId,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub customer: Option<CustomerId>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A short-lived customer-scoped credential for client-side SDKs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EphemeralKey {
    pub id: String,
    pub secret: String,
}

/// A saved payment method (card) attached to a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: PaymentMethodId,
    #[serde(rename = "type", default)]
    pub method_type: Option<String>,
    #[serde(default)]
    pub customer: Option<CustomerId>,
}

// ---------------------------------------------------------------------------
// Connected accounts
// ---------------------------------------------------------------------------

/// Business-profile block on a connected account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountBusinessProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub product_description: Option<String>,
    #[serde(default)]
    pub support_email: Option<String>,
    #[serde(default)]
    pub support_phone: Option<String>,
    #[serde(default)]
    pub support_url: Option<String>,
    #[serde(default)]
    pub mcc: Option<String>,
}

/// Company address block on a connected account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountAddress {
    #[serde(default)]
    pub line1: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Company block on a connected account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountCompany {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<AccountAddress>,
}

/// A connected (merchant) account snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(default)]
    pub business_profile: Option<AccountBusinessProfile>,
    #[serde(default)]
    pub company: Option<AccountCompany>,
    #[serde(default)]
    pub charges_enabled: bool,
    #[serde(default)]
    pub payouts_enabled: bool,
}

/// Confirmation returned by account deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedAccount {
    pub id: AccountId,
    #[serde(default)]
    pub deleted: bool,
}

/// A payout instrument attached to a connected account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalAccount {
    pub id: String,
    #[serde(default)]
    pub account: Option<AccountId>,
}

/// A single-use token wrapping raw bank-account details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankToken {
    pub id: String,
}

/// Raw bank-account details to tokenize for payouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankAccountParams {
    pub country: String,
    pub currency: Currency,
    pub account_holder_name: String,
    /// `individual` or `company`.
    pub account_holder_type: String,
    pub account_number: String,
}

impl BankAccountParams {
    /// Encode to the processor's token-creation form representation.
    pub fn to_form(&self) -> Vec<FormPair> {
        let mut form = Vec::new();
        push(&mut form, "bank_account[country]", &self.country);
        push(&mut form, "bank_account[currency]", self.currency.as_str());
        push(
            &mut form,
            "bank_account[account_holder_name]",
            &self.account_holder_name,
        );
        push(
            &mut form,
            "bank_account[account_holder_type]",
            &self.account_holder_type,
        );
        push(
            &mut form,
            "bank_account[account_number]",
            &self.account_number,
        );
        form
    }
}

/// Shared onboarding field bundle for account create and update.
///
/// Wraps the merchant-submitted [`MerchantProfile`] together with the
/// platform-supplied onboarding defaults and the terms-acceptance
/// timestamp taken at call time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountOnboarding {
    pub profile: MerchantProfile,
    pub dob: DateOfBirth,
    pub tos_accepted_at: DateTime<Utc>,
    pub tos_ip: String,
    pub statement_descriptor: String,
}

impl AccountOnboarding {
    /// Bundle a merchant profile with the documented placeholder defaults.
    pub fn new(
        profile: MerchantProfile,
        defaults: &OnboardingDefaults,
        tos_accepted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            profile,
            dob: defaults.placeholder_dob,
            tos_accepted_at,
            tos_ip: defaults.tos_acceptance_ip.clone(),
            statement_descriptor: defaults.statement_descriptor.clone(),
        }
    }

    /// Encode the fields shared by create and update.
    fn append_form(&self, form: &mut Vec<FormPair>) {
        let profile = &self.profile;
        push(form, "email", profile.email.as_str());
        push(form, "business_type", "individual");

        push(form, "business_profile[name]", &profile.business.name);
        push(
            form,
            "business_profile[product_description]",
            &profile.business.product_description,
        );
        push(form, "business_profile[url]", &profile.business.url);
        push(form, "business_profile[support_email]", profile.email.as_str());
        push(form, "business_profile[support_phone]", &profile.phone);
        push(
            form,
            "business_profile[support_url]",
            &profile.business.support_url,
        );
        push(form, "business_profile[mcc]", &profile.business.mcc);

        push(
            form,
            "capabilities[card_payments][requested]",
            "true",
        );
        push(form, "capabilities[transfers][requested]", "true");

        push(
            form,
            "tos_acceptance[date]",
            self.tos_accepted_at.timestamp(),
        );
        push(form, "tos_acceptance[ip]", &self.tos_ip);

        push(form, "individual[first_name]", &profile.person.first_name);
        push(form, "individual[last_name]", &profile.person.last_name);
        push(form, "individual[email]", profile.email.as_str());
        push(form, "individual[phone]", &profile.phone);
        push(form, "individual[dob][day]", self.dob.day);
        push(form, "individual[dob][month]", self.dob.month);
        push(form, "individual[dob][year]", self.dob.year);

        push(form, "company[address][line1]", &profile.address.line1);
        push(form, "company[address][city]", &profile.address.city);
        push(form, "company[address][state]", &profile.address.state);
        push(
            form,
            "company[address][postal_code]",
            &profile.address.postal_code,
        );
        push(form, "company[address][country]", &profile.address.country);
        push(form, "company[phone]", &profile.phone);
        push(form, "company[name]", &profile.business.name);

        push(
            form,
            "settings[payments][statement_descriptor]",
            &self.statement_descriptor,
        );
    }
}

/// Parameters for creating a connected account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAccountParams {
    pub onboarding: AccountOnboarding,
}

impl CreateAccountParams {
    /// Encode to form pairs, including the platform-controlled
    /// configuration: the platform collects fees, bears payment losses,
    /// and grants the merchant no processor dashboard.
    pub fn to_form(&self) -> Vec<FormPair> {
        let mut form = Vec::new();
        push(&mut form, "country", &self.onboarding.profile.address.country);
        push(
            &mut form,
            "controller[requirement_collection]",
            "application",
        );
        push(&mut form, "controller[fees][payer]", "application");
        push(&mut form, "controller[losses][payments]", "application");
        push(&mut form, "controller[dashboard][type]", "none");
        self.onboarding.append_form(&mut form);
        form
    }
}

/// Parameters for updating a connected account's details.
///
/// Same shape as create minus the immutable fields (country, controller
/// configuration) already bound at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateAccountParams {
    pub onboarding: AccountOnboarding,
}

impl UpdateAccountParams {
    /// Encode to form pairs.
    pub fn to_form(&self) -> Vec<FormPair> {
        let mut form = Vec::new();
        self.onboarding.append_form(&mut form);
        form
    }
}

// ---------------------------------------------------------------------------
// Terminal
// ---------------------------------------------------------------------------

/// A physical card reader registered with the processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalReader {
    pub id: ReaderId,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
}

/// A short-lived token a reader uses to connect to the processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionToken {
    pub secret: String,
}
