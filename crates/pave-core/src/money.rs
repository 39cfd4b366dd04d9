// SPDX-License-Identifier: Apache-2.0
//! # Currency and Minor-Unit Amounts
//!
//! All amounts in the Pave stack are integer **minor units** of a currency
//! (cents, paise, …), exactly as the processor's wire format expects.
//! Fractional amounts never exist inside the system; rounding happens in
//! one place only, the fee policy ([`crate::fees`]).

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A charge amount in integer minor units of its currency.
///
/// `i64` matches the processor wire format. Amounts are validated positive
/// at the API boundary; the orchestration layer relies on that invariant.
pub type MinorUnits = i64;

/// A lowercase three-letter ISO-4217 currency code (`"eur"`, `"inr"`, …).
///
/// The processor expects lowercase codes; mixed-case input is normalized
/// at construction so equality is reliable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Parse and normalize a currency code.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let raw = raw.as_ref();
        if raw.len() != 3 || !raw.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::Malformed {
                field: "currency",
                expected: "three-letter ISO-4217 code",
                value: raw.to_string(),
            });
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    /// Access the lowercase code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}
