// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceConfig {
    pub buy_price: Option<f64>,
    pub sell_price: Option<f64>,
}

/// Partial price update: `None` leaves the field alone, `Some(None)` unsets it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceConfigUpdate {
    pub buy_price: Option<Option<f64>>,
    pub sell_price: Option<Option<f64>>,
}

impl PriceConfig {
    pub fn price_for(&self, base: PriceBase) -> Option<f64> {
        match base {
            PriceBase::Buy => self.buy_price,
            PriceBase::Sell => self.sell_price,
        }
    }

    pub fn apply(&mut self, update: PriceConfigUpdate) {
        if let Some(buy) = update.buy_price {
            self.buy_price = buy;
        }
        if let Some(sell) = update.sell_price {
            self.sell_price = sell;
        }
    }
}

/// Starting money per category. Insertion order is kept for display only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitialFunds(Vec<(String, f64)>);

impl InitialFunds {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Sets a category's amount, keeping its position if it already exists.
    pub fn set(&mut self, category: &str, amount: f64) {
        match self.0.iter_mut().find(|(name, _)| name == category) {
            Some(slot) => slot.1 = amount,
            None => self.0.push((category.to_string(), amount)),
        }
    }

    pub fn remove(&mut self, category: &str) -> Option<f64> {
        let idx = self.0.iter().position(|(name, _)| name == category)?;
        Some(self.0.remove(idx).1)
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, amount)| *amount)
    }

    pub fn total(&self) -> f64 {
        self.0.iter().map(|(_, amount)| amount).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, amount)| (name.as_str(), *amount))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for InitialFunds {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut funds = InitialFunds::new();
        for (name, amount) in iter {
            funds.set(&name.into(), amount);
        }
        funds
    }
}

impl Serialize for InitialFunds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, amount) in &self.0 {
            map.serialize_entry(name, amount)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for InitialFunds {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FundsVisitor;

        impl<'de> Visitor<'de> for FundsVisitor {
            type Value = InitialFunds;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category name to amount")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut funds = InitialFunds::new();
                while let Some((name, amount)) = access.next_entry::<String, f64>()? {
                    funds.set(&name, amount);
                }
                Ok(funds)
            }
        }

        deserializer.deserialize_map(FundsVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Payment,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Payment => "payment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(TransactionKind::Income),
            "payment" => Some(TransactionKind::Payment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceBase {
    Buy,
    Sell,
}

impl PriceBase {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceBase::Buy => "buy",
            PriceBase::Sell => "sell",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Some(PriceBase::Buy),
            "sell" => Some(PriceBase::Sell),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amount {
    Fixed { amount: f64 },
    /// `amount` is a percentage of the configured buy or sell price.
    Percentage { amount: f64, base: PriceBase },
}

impl Amount {
    pub fn raw(&self) -> f64 {
        match self {
            Amount::Fixed { amount } | Amount::Percentage { amount, .. } => *amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Installment {
    pub id: String,
    pub date: DateTime<Utc>,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Schedule {
    Single {
        date: DateTime<Utc>,
    },
    /// `start_date` is only a label once installments exist; each installment
    /// carries its own date.
    Installments {
        start_date: DateTime<Utc>,
        installments: Vec<Installment>,
    },
}

impl Schedule {
    pub fn anchor_date(&self) -> DateTime<Utc> {
        match self {
            Schedule::Single { date } => *date,
            Schedule::Installments { start_date, .. } => *start_date,
        }
    }

    pub fn installments(&self) -> &[Installment] {
        match self {
            Schedule::Single { .. } => &[],
            Schedule::Installments { installments, .. } => installments,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    pub amount: Amount,
    pub schedule: Schedule,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl Transaction {
    pub fn date(&self) -> DateTime<Utc> {
        self.schedule.anchor_date()
    }

    pub fn is_installment(&self) -> bool {
        !self.schedule.installments().is_empty()
    }
}

/// Field-wise update for an existing transaction. Nested options clear the
/// field when set to `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub kind: Option<TransactionKind>,
    pub date: Option<DateTime<Utc>>,
    pub amount: Option<Amount>,
    pub installments: Option<Vec<Installment>>,
    pub description: Option<Option<String>>,
    pub category: Option<Option<String>>,
}

impl TransactionPatch {
    pub fn apply_to(self, tx: &mut Transaction) {
        if let Some(kind) = self.kind {
            tx.kind = kind;
        }
        if let Some(amount) = self.amount {
            tx.amount = amount;
        }
        let anchor = self.date.unwrap_or_else(|| tx.date());
        let installments = match self.installments {
            Some(list) => list,
            None => tx.schedule.installments().to_vec(),
        };
        tx.schedule = if installments.is_empty() {
            Schedule::Single { date: anchor }
        } else {
            Schedule::Installments {
                start_date: anchor,
                installments,
            }
        };
        if let Some(description) = self.description {
            tx.description = description;
        }
        if let Some(category) = self.category {
            tx.category = category;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Checkpoint {
    pub date: DateTime<Utc>,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub price_config: PriceConfig,
    pub initial_funds: InitialFunds,
    pub transactions: Vec<Transaction>,
    pub checkpoint: Option<Checkpoint>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            price_config: PriceConfig::default(),
            initial_funds: [("cash", 0.0), ("stocks", 0.0), ("other", 0.0)]
                .into_iter()
                .collect(),
            transactions: Vec::new(),
            checkpoint: None,
        }
    }
}

/// One row of the computed timeline. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub date: DateTime<Utc>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub amount: f64,
    pub running_balance: f64,
    pub is_checkpoint: bool,
    pub is_archived: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_initial: f64,
    pub total_income: f64,
    pub total_payments: f64,
    pub final_balance: f64,
}
