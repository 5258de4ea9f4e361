// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::labels::Headings;
use crate::state::PlanStore;
use crate::storage::Storage;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle<S: Storage>(store: &PlanStore<S>, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("summary", sub)) = m.subcommand() {
        summary(store, sub)?;
    }
    Ok(())
}

fn summary<S: Storage>(store: &PlanStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let stats = store.summary();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &stats)? {
        return Ok(());
    }
    let settings = store.settings()?;
    let h = Headings::for_language(settings.language);
    let ccy = settings.currency;
    let data = vec![
        vec![h.total_initial.to_string(), fmt_money(stats.total_initial, ccy)],
        vec![h.total_income.to_string(), fmt_money(stats.total_income, ccy)],
        vec![h.total_payments.to_string(), fmt_money(stats.total_payments, ccy)],
        vec![h.final_balance.to_string(), fmt_money(stats.final_balance, ccy)],
    ];
    println!("{}", pretty_table(&[h.summary, h.amount], data));
    Ok(())
}
