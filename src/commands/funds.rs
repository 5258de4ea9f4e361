// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::state::PlanStore;
use crate::storage::Storage;
use crate::utils::{fmt_money, maybe_print_json, parse_amount, pretty_table, required_arg};
use anyhow::Result;

pub fn handle<S: Storage>(store: &mut PlanStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let name = required_arg(sub, "name")?.trim();
            let amount = parse_amount(required_arg(sub, "amount")?)?;
            store.set_fund(name, amount)?;
            println!("Set '{}' to {}", name, amount);
        }
        Some(("rm", sub)) => {
            let name = required_arg(sub, "name")?.trim();
            store.remove_fund(name)?;
            println!("Removed fund '{}'", name);
        }
        Some(("list", sub)) => {
            let funds = &store.state().initial_funds;
            if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), funds)? {
                return Ok(());
            }
            let ccy = store.settings()?.currency;
            let mut data: Vec<Vec<String>> = funds
                .iter()
                .map(|(name, amount)| vec![name.to_string(), fmt_money(amount, ccy)])
                .collect();
            data.push(vec!["Total".into(), fmt_money(funds.total(), ccy)]);
            println!("{}", pretty_table(&["Category", "Amount"], data));
        }
        _ => {}
    }
    Ok(())
}
