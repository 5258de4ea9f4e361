// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Running-balance timeline over initial funds, transactions and an optional
//! checkpoint. Everything here is pure: callers pass snapshots in and get a
//! fresh `Vec<TimelineEntry>` back.

use chrono::{DateTime, Duration, Utc};

use crate::labels::Labels;
use crate::models::{
    Checkpoint, InitialFunds, PriceConfig, Schedule, SummaryStats, TimelineEntry, Transaction,
    TransactionKind,
};
use crate::valuation::{resolve_amount, signed_amount};

/// A balance-affecting event before sorting.
#[derive(Debug, Clone)]
struct Event {
    date: DateTime<Utc>,
    description: String,
    category: Option<String>,
    amount: f64,
}

fn expand(transactions: &[Transaction], prices: &PriceConfig, labels: &Labels) -> Vec<Event> {
    let mut events = Vec::new();
    for tx in transactions {
        let value = resolve_amount(tx, prices);
        let base = tx.description.clone().unwrap_or_else(|| match tx.kind {
            TransactionKind::Income => labels.income.clone(),
            TransactionKind::Payment => labels.payment.clone(),
        });

        match &tx.schedule {
            Schedule::Installments { installments, .. } if !installments.is_empty() => {
                for inst in installments {
                    events.push(Event {
                        date: inst.date,
                        description: format!("{} ({}%)", base, inst.percentage),
                        category: tx.category.clone(),
                        amount: signed_amount(tx.kind, value * inst.percentage / 100.0),
                    });
                }
            }
            schedule => events.push(Event {
                date: schedule.anchor_date(),
                description: base,
                category: tx.category.clone(),
                amount: signed_amount(tx.kind, value),
            }),
        }
    }
    events
}

pub fn generate_timeline(
    funds: &InitialFunds,
    transactions: &[Transaction],
    prices: &PriceConfig,
    labels: &Labels,
    checkpoint: Option<&Checkpoint>,
) -> Vec<TimelineEntry> {
    generate_timeline_at(funds, transactions, prices, labels, checkpoint, Utc::now())
}

/// Same as [`generate_timeline`], with `now` used to date the lone entry of
/// an empty timeline.
pub fn generate_timeline_at(
    funds: &InitialFunds,
    transactions: &[Transaction],
    prices: &PriceConfig,
    labels: &Labels,
    checkpoint: Option<&Checkpoint>,
    now: DateTime<Utc>,
) -> Vec<TimelineEntry> {
    let total_initial = funds.total();
    let mut events = expand(transactions, prices, labels);

    if events.is_empty() {
        return vec![TimelineEntry {
            date: now,
            description: labels.initial_balance.clone(),
            category: None,
            amount: total_initial,
            running_balance: total_initial,
            is_checkpoint: false,
            is_archived: checkpoint.is_some_and(|cp| now < cp.date),
        }];
    }

    // Stable: events on the same instant keep expansion order.
    events.sort_by_key(|e| e.date);

    // Keep the opening entry ahead of a checkpoint that predates every event.
    let mut opening = events[0].date;
    if let Some(cp) = checkpoint {
        opening = opening.min(cp.date);
    }

    let mut entries = Vec::with_capacity(events.len() + 2);
    entries.push(TimelineEntry {
        date: opening - Duration::milliseconds(1),
        description: labels.initial_balance.clone(),
        category: None,
        amount: total_initial,
        running_balance: total_initial,
        is_checkpoint: false,
        is_archived: false,
    });

    let mut balance = total_initial;
    let mut pending = checkpoint;
    for event in events {
        if let Some(cp) = pending.filter(|cp| event.date >= cp.date) {
            splice_checkpoint(&mut entries, cp, balance, labels);
            balance = cp.balance;
            pending = None;
        }
        balance += event.amount;
        entries.push(TimelineEntry {
            date: event.date,
            description: event.description,
            category: event.category,
            amount: event.amount,
            running_balance: balance,
            is_checkpoint: false,
            is_archived: false,
        });
    }
    if let Some(cp) = pending {
        splice_checkpoint(&mut entries, cp, balance, labels);
    }

    entries
}

/// Appends the checkpoint entry and archives everything emitted before it.
fn splice_checkpoint(
    entries: &mut Vec<TimelineEntry>,
    cp: &Checkpoint,
    balance: f64,
    labels: &Labels,
) {
    for entry in entries.iter_mut() {
        entry.is_archived = true;
    }
    entries.push(TimelineEntry {
        date: cp.date,
        description: labels.checkpoint.clone(),
        category: None,
        amount: cp.balance - balance,
        running_balance: cp.balance,
        is_checkpoint: true,
        is_archived: false,
    });
}

pub fn summary_stats(
    funds: &InitialFunds,
    transactions: &[Transaction],
    prices: &PriceConfig,
) -> SummaryStats {
    let total_initial = funds.total();
    let mut total_income = 0.0;
    let mut total_payments = 0.0;
    for tx in transactions {
        let value = resolve_amount(tx, prices);
        match tx.kind {
            TransactionKind::Income => total_income += value,
            TransactionKind::Payment => total_payments += value,
        }
    }
    SummaryStats {
        total_initial,
        total_income,
        total_payments,
        final_balance: total_initial + total_income - total_payments,
    }
}
