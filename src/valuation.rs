// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Amount, PriceConfig, Transaction, TransactionKind};

/// Resolves a transaction to its monetary magnitude.
///
/// Percentage amounts against an unset (or zero) price are worth 0 until the
/// price is configured. Negative stored amounts pass through unclamped.
pub fn resolve_amount(tx: &Transaction, prices: &PriceConfig) -> f64 {
    match tx.amount {
        Amount::Fixed { amount } => amount,
        Amount::Percentage { amount, base } => match prices.price_for(base) {
            Some(price) if price != 0.0 => price * amount / 100.0,
            _ => 0.0,
        },
    }
}

pub fn signed_amount(kind: TransactionKind, value: f64) -> f64 {
    match kind {
        TransactionKind::Income => value,
        TransactionKind::Payment => -value,
    }
}
