// SPDX-License-Identifier: Apache-2.0
//! # Identifier Newtypes
//!
//! Newtypes for the processor-issued object identifiers Pave handles.
//! All of them are opaque strings minted by the remote processor — Pave
//! never parses their internal structure, it only refuses empty ones.
//!
//! Serialization is transparent: each newtype serializes as its inner
//! string, so the types can appear directly in wire structs.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Declare an opaque, processor-issued string identifier.
///
/// Construction rejects empty input — an empty identifier forwarded to the
/// processor produces a confusing remote error instead of a local one.
macro_rules! processor_id {
    ($(#[$doc:meta])* $ty:ident, $field:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $ty(String);

        impl $ty {
            /// Wrap a processor-issued identifier, rejecting empty input.
            pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
                let raw = raw.into();
                if raw.trim().is_empty() {
                    return Err(ValidationError::Empty { field: $field });
                }
                Ok(Self(raw))
            }

            /// Access the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the newtype, returning the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

processor_id!(
    /// A connected (merchant) account identifier on the payment processor.
    AccountId,
    "account_id"
);

processor_id!(
    /// A customer identifier in the processor's customer directory.
    CustomerId,
    "customer_id"
);

processor_id!(
    /// A payment-intent identifier.
    PaymentIntentId,
    "payment_intent_id"
);

processor_id!(
    /// A saved payment-method (card) identifier.
    PaymentMethodId,
    "payment_method_id"
);

processor_id!(
    /// A setup-intent identifier.
    SetupIntentId,
    "setup_intent_id"
);

processor_id!(
    /// A terminal reader identifier.
    ReaderId,
    "reader_id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_processor_issued_ids() {
        let id = AccountId::new("acct_1PizIx4EUuOCjaF1").unwrap();
        assert_eq!(id.as_str(), "acct_1PizIx4EUuOCjaF1");
        assert_eq!(id.to_string(), "acct_1PizIx4EUuOCjaF1");
    }

    #[test]
    fn rejects_empty_and_blank_ids() {
        assert!(AccountId::new("").is_err());
        assert!(CustomerId::new("   ").is_err());
    }

    #[test]
    fn serializes_transparently() {
        let id = CustomerId::new("cus_abc123").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"cus_abc123\"");
        let back: CustomerId = serde_json::from_str("\"cus_abc123\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn deserialize_rejects_empty() {
        assert!(serde_json::from_str::<PaymentIntentId>("\"\"").is_err());
    }
}
