// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::PlanError;
use crate::labels::Currency;
use crate::models::{
    Amount, Installment, PriceBase, Schedule, Transaction, TransactionKind, TransactionPatch,
};
use crate::state::{PlanStore, installment_total};
use crate::storage::Storage;
use crate::utils::{
    fmt_date, fmt_money, maybe_print_json, parse_amount, parse_date, parse_installment,
    pretty_table, required_arg,
};
use anyhow::{Result, anyhow};
use serde::Serialize;
use uuid::Uuid;

pub fn handle<S: Storage>(store: &mut PlanStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("update", sub)) => update(store, sub)?,
        Some(("rm", sub)) => {
            let id = required_arg(sub, "id")?.trim();
            store.delete_transaction(id)?;
            println!("Removed transaction {}", id);
        }
        Some(("list", sub)) => list(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_kind(s: &str) -> Result<TransactionKind> {
    TransactionKind::parse(s).ok_or_else(|| anyhow!("Invalid type '{}' (use income|payment)", s))
}

fn parse_base(s: &str) -> Result<PriceBase> {
    PriceBase::parse(s).ok_or_else(|| anyhow!("Invalid price base '{}' (use buy|sell)", s))
}

/// Installments are kept in date order, the way they are entered.
fn parse_installments(sub: &clap::ArgMatches) -> Result<Option<Vec<Installment>>> {
    let Some(values) = sub.get_many::<String>("installment") else {
        return Ok(None);
    };
    let mut list = Vec::new();
    for raw in values {
        let (date, percentage) = parse_installment(raw)?;
        list.push(Installment {
            id: Uuid::new_v4().to_string(),
            date,
            percentage,
        });
    }
    list.sort_by_key(|i| i.date);
    Ok(Some(list))
}

fn non_empty(s: Option<&String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn add<S: Storage>(store: &mut PlanStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let kind = parse_kind(required_arg(sub, "type")?)?;
    let date = parse_date(required_arg(sub, "date")?)?;
    let raw = parse_amount(required_arg(sub, "amount")?)?;
    let amount = match sub.get_one::<String>("percent-of") {
        Some(base) => Amount::Percentage {
            amount: raw,
            base: parse_base(base)?,
        },
        None => Amount::Fixed { amount: raw },
    };
    let schedule = match parse_installments(sub)? {
        Some(installments) => Schedule::Installments {
            start_date: date,
            installments,
        },
        None => Schedule::Single { date },
    };
    let tx = Transaction {
        id: Uuid::new_v4().to_string(),
        kind,
        amount,
        schedule,
        description: non_empty(sub.get_one::<String>("description")),
        category: non_empty(sub.get_one::<String>("category")),
    };
    let id = tx.id.clone();
    store.add_transaction(tx)?;
    println!("Recorded {} {} on {} (id: {})", kind.as_str(), raw, fmt_date(&date), id);
    Ok(())
}

fn update<S: Storage>(store: &mut PlanStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = required_arg(sub, "id")?.trim();
    let current = store
        .state()
        .transactions
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.amount)
        .ok_or_else(|| PlanError::TransactionNotFound(id.to_string()))?;

    let mut patch = TransactionPatch::default();
    if let Some(kind) = sub.get_one::<String>("type") {
        patch.kind = Some(parse_kind(kind)?);
    }
    if let Some(date) = sub.get_one::<String>("date") {
        patch.date = Some(parse_date(date)?);
    }

    let raw = match sub.get_one::<String>("amount") {
        Some(a) => Some(parse_amount(a)?),
        None => None,
    };
    let base = match sub.get_one::<String>("percent-of") {
        Some(b) => Some(parse_base(b)?),
        None => None,
    };
    if raw.is_some() || base.is_some() || sub.get_flag("fixed") {
        let value = raw.unwrap_or(current.raw());
        patch.amount = Some(match (base, current) {
            (Some(base), _) => Amount::Percentage {
                amount: value,
                base,
            },
            (None, _) if sub.get_flag("fixed") => Amount::Fixed { amount: value },
            (None, Amount::Percentage { base, .. }) => Amount::Percentage {
                amount: value,
                base,
            },
            (None, Amount::Fixed { .. }) => Amount::Fixed { amount: value },
        });
    }

    if sub.get_flag("no-installments") {
        patch.installments = Some(Vec::new());
    } else {
        patch.installments = parse_installments(sub)?;
    }
    if let Some(d) = sub.get_one::<String>("description") {
        patch.description = Some(non_empty(Some(d)));
    }
    if let Some(c) = sub.get_one::<String>("category") {
        patch.category = Some(non_empty(Some(c)));
    }

    store.update_transaction(id, patch)?;
    println!("Updated transaction {}", id);
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub kind: String,
    pub description: String,
    pub category: String,
    pub amount: String,
    pub installments: String,
}

pub fn query_rows(txs: &[Transaction], ccy: Currency) -> Vec<TransactionRow> {
    let mut rows: Vec<(chrono::DateTime<chrono::Utc>, TransactionRow)> = txs
        .iter()
        .map(|t| {
            let amount = match t.amount {
                Amount::Fixed { amount } => fmt_money(amount, ccy),
                Amount::Percentage { amount, base } => format!("{}% of {}", amount, base.as_str()),
            };
            let installments = if t.is_installment() {
                format!(
                    "{} ({}%)",
                    t.schedule.installments().len(),
                    installment_total(t)
                )
            } else {
                String::new()
            };
            (
                t.date(),
                TransactionRow {
                    id: t.id.clone(),
                    date: fmt_date(&t.date()),
                    kind: t.kind.as_str().to_string(),
                    description: t.description.clone().unwrap_or_default(),
                    category: t.category.clone().unwrap_or_default(),
                    amount,
                    installments,
                },
            )
        })
        .collect();
    rows.sort_by_key(|(d, _)| *d);
    rows.into_iter().map(|(_, r)| r).collect()
}

fn list<S: Storage>(store: &PlanStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let ccy = store.settings()?.currency;
    let data = query_rows(&store.state().transactions, ccy);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .into_iter()
            .map(|r| {
                vec![
                    r.date,
                    r.kind,
                    r.description,
                    r.category,
                    r.amount,
                    r.installments,
                    r.id,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Type", "Description", "Category", "Amount", "Installments", "Id"],
                rows,
            )
        );
    }
    Ok(())
}
