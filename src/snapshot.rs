// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Versioned JSON document used for export/import and interchange with the
//! browser planner.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::models::{
    Amount, AppState, Checkpoint, InitialFunds, Installment, PriceBase, PriceConfig, Schedule,
    Transaction, TransactionKind,
};

pub const FORMAT_VERSION: &str = "1.0";

mod iso_date {
    use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc).trunc_subsecs(3))
            .map_err(|e| D::Error::custom(format!("invalid date '{}': {}", raw, e)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum AmountType {
    Fixed,
    Percentage,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstallmentRecord {
    id: String,
    #[serde(with = "iso_date")]
    date: DateTime<Utc>,
    percentage: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionRecord {
    id: String,
    #[serde(rename = "type")]
    kind: TransactionKind,
    #[serde(with = "iso_date")]
    date: DateTime<Utc>,
    amount_type: AmountType,
    amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    percentage_base: Option<PriceBase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_installment: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    installments: Option<Vec<InstallmentRecord>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CheckpointRecord {
    #[serde(with = "iso_date")]
    date: DateTime<Utc>,
    balance: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SerializedState {
    version: String,
    timestamp: String,
    price_config: PriceConfig,
    initial_funds: InitialFunds,
    transactions: Vec<TransactionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    checkpoint: Option<CheckpointRecord>,
}

impl From<&Transaction> for TransactionRecord {
    fn from(tx: &Transaction) -> Self {
        let (amount_type, percentage_base) = match tx.amount {
            Amount::Fixed { .. } => (AmountType::Fixed, None),
            Amount::Percentage { base, .. } => (AmountType::Percentage, Some(base)),
        };
        let installments: Vec<InstallmentRecord> = tx
            .schedule
            .installments()
            .iter()
            .map(|inst| InstallmentRecord {
                id: inst.id.clone(),
                date: inst.date,
                percentage: inst.percentage,
            })
            .collect();
        let is_installment = !installments.is_empty();
        TransactionRecord {
            id: tx.id.clone(),
            kind: tx.kind,
            date: tx.date(),
            amount_type,
            amount: tx.amount.raw(),
            percentage_base,
            description: tx.description.clone(),
            category: tx.category.clone(),
            is_installment: is_installment.then_some(true),
            installments: is_installment.then_some(installments),
        }
    }
}

impl From<TransactionRecord> for Transaction {
    fn from(rec: TransactionRecord) -> Self {
        let amount = match rec.amount_type {
            AmountType::Fixed => Amount::Fixed { amount: rec.amount },
            // A percentage record without a base has always priced against the sell price.
            AmountType::Percentage => Amount::Percentage {
                amount: rec.amount,
                base: rec.percentage_base.unwrap_or(PriceBase::Sell),
            },
        };
        let installments: Vec<Installment> = rec
            .installments
            .unwrap_or_default()
            .into_iter()
            .map(|inst| Installment {
                id: inst.id,
                date: inst.date,
                percentage: inst.percentage,
            })
            .collect();
        let schedule = if rec.is_installment.unwrap_or(false) && !installments.is_empty() {
            Schedule::Installments {
                start_date: rec.date,
                installments,
            }
        } else {
            Schedule::Single { date: rec.date }
        };
        Transaction {
            id: rec.id,
            kind: rec.kind,
            amount,
            schedule,
            description: rec.description,
            category: rec.category,
        }
    }
}

pub fn export_json(state: &AppState) -> Result<String, PlanError> {
    export_json_at(state, Utc::now())
}

pub fn export_json_at(state: &AppState, timestamp: DateTime<Utc>) -> Result<String, PlanError> {
    let doc = SerializedState {
        version: FORMAT_VERSION.to_string(),
        timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        price_config: state.price_config,
        initial_funds: state.initial_funds.clone(),
        transactions: state.transactions.iter().map(TransactionRecord::from).collect(),
        checkpoint: state.checkpoint.map(|cp| CheckpointRecord {
            date: cp.date,
            balance: cp.balance,
        }),
    };
    serde_json::to_string_pretty(&doc).map_err(|e| PlanError::InvalidFormat(e.to_string()))
}

/// Parses an exported document. Any structural problem is `InvalidFormat`.
pub fn import_json(json: &str) -> Result<AppState, PlanError> {
    let doc: SerializedState =
        serde_json::from_str(json).map_err(|e| PlanError::InvalidFormat(e.to_string()))?;
    tracing::debug!(
        version = %doc.version,
        transactions = doc.transactions.len(),
        "parsed plan document"
    );
    Ok(AppState {
        price_config: doc.price_config,
        initial_funds: doc.initial_funds,
        transactions: doc.transactions.into_iter().map(Transaction::from).collect(),
        checkpoint: doc.checkpoint.map(|cp| Checkpoint {
            date: cp.date,
            balance: cp.balance,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::Value;

    fn sample() -> AppState {
        let d = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        AppState {
            price_config: PriceConfig {
                buy_price: Some(2_000_000.0),
                sell_price: None,
            },
            initial_funds: [("cash", 100_000.0)].into_iter().collect(),
            transactions: vec![Transaction {
                id: "t1".into(),
                kind: TransactionKind::Payment,
                amount: Amount::Percentage {
                    amount: 10.0,
                    base: PriceBase::Buy,
                },
                schedule: Schedule::Installments {
                    start_date: d,
                    installments: vec![
                        Installment {
                            id: "a".into(),
                            date: d,
                            percentage: 40.0,
                        },
                        Installment {
                            id: "b".into(),
                            date: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
                            percentage: 60.0,
                        },
                    ],
                },
                description: Some("Down payment".into()),
                category: None,
            }],
            checkpoint: Some(Checkpoint {
                date: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
                balance: 42.0,
            }),
        }
    }

    #[test]
    fn export_uses_camel_case_and_millisecond_dates() {
        let ts = Utc.with_ymd_and_hms(2025, 2, 2, 10, 0, 0).unwrap();
        let json = export_json_at(&sample(), ts).unwrap();
        let v: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["version"], "1.0");
        assert_eq!(v["timestamp"], "2025-02-02T10:00:00.000Z");
        assert_eq!(v["priceConfig"]["buyPrice"], 2_000_000.0);
        assert!(v["priceConfig"]["sellPrice"].is_null());
        let tx = &v["transactions"][0];
        assert_eq!(tx["type"], "payment");
        assert_eq!(tx["amountType"], "percentage");
        assert_eq!(tx["percentageBase"], "buy");
        assert_eq!(tx["isInstallment"], true);
        assert_eq!(tx["date"], "2025-01-15T00:00:00.000Z");
        assert_eq!(tx["installments"][1]["date"], "2025-06-01T00:00:00.000Z");
        assert_eq!(v["checkpoint"]["balance"], 42.0);
    }

    #[test]
    fn export_then_import_restores_state() {
        let state = sample();
        let back = import_json(&export_json(&state).unwrap()).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn imports_browser_document() {
        let json = r#"{
            "version": "1.0",
            "timestamp": "2025-01-01T08:00:00.000Z",
            "priceConfig": {"buyPrice": null, "sellPrice": 1500000},
            "initialFunds": {"cash": 1000, "stocks": 500},
            "transactions": [
                {"id": "x", "type": "income", "date": "2025-04-01T00:00:00.000Z",
                 "amountType": "percentage", "amount": 100},
                {"id": "y", "type": "payment", "date": "2025-02-01T00:00:00.000Z",
                 "amountType": "fixed", "amount": 300, "isInstallment": true, "installments": []}
            ]
        }"#;
        let state = import_json(json).unwrap();
        assert_eq!(state.initial_funds.total(), 1500.0);
        assert_eq!(
            state.transactions[0].amount,
            Amount::Percentage {
                amount: 100.0,
                base: PriceBase::Sell
            }
        );
        assert!(!state.transactions[1].is_installment());
        assert!(state.checkpoint.is_none());
    }

    #[test]
    fn malformed_documents_are_invalid_format() {
        for bad in [
            "not json",
            "{}",
            r#"{"version":"1.0","timestamp":"","priceConfig":{"buyPrice":null,"sellPrice":null},
               "initialFunds":{},"transactions":[{"id":"a","type":"gift",
               "date":"2025-01-01T00:00:00Z","amountType":"fixed","amount":1}]}"#,
            r#"{"version":"1.0","timestamp":"","priceConfig":{"buyPrice":null,"sellPrice":null},
               "initialFunds":{},"transactions":[{"id":"a","type":"income","date":"yesterday",
               "amountType":"fixed","amount":1}]}"#,
        ] {
            assert!(matches!(import_json(bad), Err(PlanError::InvalidFormat(_))));
        }
    }
}
