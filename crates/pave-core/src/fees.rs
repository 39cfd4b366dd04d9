// SPDX-License-Identifier: Apache-2.0
//! # Platform Fee Policy
//!
//! Pricing strategy for marketplace (destination-charge) checkouts. The
//! platform fee withheld from a connected account is the sum of two
//! components: an estimate of what the processor will charge the platform,
//! and the platform's own margin. Both are expressed in basis points of
//! the charge amount.
//!
//! ## Rounding
//!
//! Each component is rounded **half-up to the nearest integer minor unit**
//! independently, then summed. Truncating or ceiling the components would
//! drift fee totals across many small charges; half-up keeps the long-run
//! error centered on zero.

use crate::money::MinorUnits;

/// Pluggable pricing strategy for the platform fee on a destination charge.
///
/// Implementations must be pure: the fee for a given amount is stable for
/// the lifetime of the policy value. `Send + Sync` so a policy can be shared
/// behind an `Arc` across request tasks.
pub trait FeePolicy: Send + Sync {
    /// Compute the total platform fee, in minor units, for a charge of
    /// `amount` minor units. `amount` is positive (validated upstream).
    fn platform_fee(&self, amount: MinorUnits) -> MinorUnits;
}

/// The reference fee policy: processor-fee estimate plus platform margin,
/// each a basis-point share of the amount, each rounded half-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitPercentFeePolicy {
    /// Estimated processor cost, in basis points of the charge amount.
    pub processor_bps: u32,
    /// Platform margin, in basis points of the charge amount.
    pub margin_bps: u32,
}

impl SplitPercentFeePolicy {
    /// Build a policy from explicit basis-point shares.
    pub fn new(processor_bps: u32, margin_bps: u32) -> Self {
        Self {
            processor_bps,
            margin_bps,
        }
    }
}

impl Default for SplitPercentFeePolicy {
    /// The launch pricing: 2% processor estimate + 2% platform margin.
    fn default() -> Self {
        Self::new(200, 200)
    }
}

impl FeePolicy for SplitPercentFeePolicy {
    fn platform_fee(&self, amount: MinorUnits) -> MinorUnits {
        bps_share_half_up(amount, self.processor_bps) + bps_share_half_up(amount, self.margin_bps)
    }
}

/// `amount * bps / 10_000`, rounded half-up to the nearest minor unit.
///
/// Widens to `i128` so the intermediate product cannot overflow for any
/// representable amount.
fn bps_share_half_up(amount: MinorUnits, bps: u32) -> MinorUnits {
    debug_assert!(amount >= 0, "charge amounts are validated positive upstream");
    let scaled = amount as i128 * bps as i128;
    ((scaled + 5_000) / 10_000) as MinorUnits
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reference_policy_on_20000_is_800() {
        let policy = SplitPercentFeePolicy::default();
        assert_eq!(policy.platform_fee(20_000), 800);
    }

    #[test]
    fn components_round_half_up_independently() {
        let policy = SplitPercentFeePolicy::default();
        // 25 * 2% = 0.5 → rounds up to 1 per component.
        assert_eq!(policy.platform_fee(25), 2);
        // 24 * 2% = 0.48 → rounds down to 0 per component.
        assert_eq!(policy.platform_fee(24), 0);
        // 26 * 2% = 0.52 → rounds up to 1 per component.
        assert_eq!(policy.platform_fee(26), 2);
    }

    #[test]
    fn asymmetric_shares_are_supported() {
        let policy = SplitPercentFeePolicy::new(290, 30);
        // 10_000 * 2.9% = 290, 10_000 * 0.3% = 30.
        assert_eq!(policy.platform_fee(10_000), 320);
    }

    #[test]
    fn zero_bps_policy_charges_nothing() {
        let policy = SplitPercentFeePolicy::new(0, 0);
        assert_eq!(policy.platform_fee(123_456), 0);
    }

    proptest! {
        #[test]
        fn fee_is_never_negative(amount in 1i64..1_000_000_000_000) {
            let policy = SplitPercentFeePolicy::default();
            prop_assert!(policy.platform_fee(amount) >= 0);
        }

        #[test]
        fn fee_matches_closed_form(amount in 1i64..1_000_000_000_000) {
            let policy = SplitPercentFeePolicy::default();
            let one = (amount as i128 * 200 + 5_000) / 10_000;
            prop_assert_eq!(policy.platform_fee(amount) as i128, one * 2);
        }

        #[test]
        fn fee_is_monotonic_in_amount(amount in 1i64..1_000_000_000) {
            let policy = SplitPercentFeePolicy::default();
            prop_assert!(policy.platform_fee(amount + 1) >= policy.platform_fee(amount));
        }
    }
}
