// SPDX-License-Identifier: Apache-2.0
//! Route modules for the HTTP surface.
//!
//! Every handler follows the same thin shape: deserialize → validate →
//! invoke one flow operation → shape the JSON response. Anything with a
//! decision in it lives in `pave-flows`, not here.

pub mod accounts;
pub mod cards;
pub mod checkout;
pub mod payment_intents;
pub mod terminal;
