// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Amount, AppState, TimelineEntry};
use crate::state::{PERCENTAGE_TOLERANCE, PlanStore, installment_total};
use crate::storage::Storage;
use crate::utils::{fmt_date, pretty_table};
use anyhow::Result;

/// Problems that validation on edit would have caught, plus plan-level
/// warnings. Imported plans are never validated, so this is where they show.
pub fn check(state: &AppState, timeline: &[TimelineEntry]) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    // 1) transaction-level checks
    for t in &state.transactions {
        let installments = t.schedule.installments();
        for i in installments {
            if !(i.percentage > 0.0 && i.percentage <= 100.0) {
                rows.push(vec![
                    "installment_out_of_range".into(),
                    format!("{} {} {}%", t.id, fmt_date(&i.date), i.percentage),
                ]);
            }
        }
        if !installments.is_empty() {
            let total = installment_total(t);
            if (total - 100.0).abs() >= PERCENTAGE_TOLERANCE {
                rows.push(vec!["installment_sum".into(), format!("{} {}%", t.id, total)]);
            }
        }
        if let Amount::Percentage { base, .. } = t.amount {
            if state.price_config.price_for(base).unwrap_or(0.0) == 0.0 {
                rows.push(vec![
                    "price_not_set".into(),
                    format!("{} uses {} price", t.id, base.as_str()),
                ]);
            }
        }
    }

    // 2) checkpoint outside the span of the plan
    if let Some(cp) = state.checkpoint {
        let dates: Vec<_> = state
            .transactions
            .iter()
            .flat_map(|t| match t.schedule.installments() {
                [] => vec![t.date()],
                list => list.iter().map(|i| i.date).collect(),
            })
            .collect();
        if let (Some(first), Some(last)) = (dates.iter().min(), dates.iter().max()) {
            if cp.date < *first || cp.date > *last {
                rows.push(vec![
                    "checkpoint_outside_plan".into(),
                    format!(
                        "{} not in {}..{}",
                        fmt_date(&cp.date),
                        fmt_date(first),
                        fmt_date(last)
                    ),
                ]);
            }
        }
    }

    // 3) first dip below zero among live entries
    if let Some(e) = timeline
        .iter()
        .find(|e| !e.is_archived && e.running_balance < 0.0)
    {
        rows.push(vec![
            "negative_balance".into(),
            format!("{} {} {:.2}", fmt_date(&e.date), e.description, e.running_balance),
        ]);
    }

    rows
}

pub fn handle<S: Storage>(store: &PlanStore<S>) -> Result<()> {
    let timeline = store.timeline(&store.labels()?);
    let rows = check(store.state(), &timeline);
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
