// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures callers need to tell apart. Everything else travels as `anyhow`.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Invalid JSON format: {0}")]
    InvalidFormat(String),
    #[error("Transaction '{0}' not found")]
    TransactionNotFound(String),
    #[error("Transaction '{0}' already exists")]
    DuplicateTransaction(String),
    #[error("Fund category '{0}' not found")]
    FundNotFound(String),
    #[error("Amount for '{name}' must not be negative (got {amount})")]
    NegativeFund { name: String, amount: f64 },
    #[error("Installment transaction needs at least one installment")]
    NoInstallments,
    #[error("Installment percentage must be between 0 and 100 (got {0})")]
    InstallmentOutOfRange(f64),
    #[error("Installment percentages must add up to 100% (got {0}%)")]
    InstallmentSum(f64),
}
