// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Checkpoint;
use crate::state::PlanStore;
use crate::storage::Storage;
use crate::utils::{fmt_date, fmt_money, parse_amount, parse_date, required_arg};
use anyhow::Result;

pub fn handle<S: Storage>(store: &mut PlanStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let date = parse_date(required_arg(sub, "date")?)?;
            let balance = parse_amount(required_arg(sub, "balance")?)?;
            let replaced = store.state().checkpoint.is_some();
            store.set_checkpoint(Checkpoint { date, balance })?;
            println!(
                "{} checkpoint at {}: {}",
                if replaced { "Updated" } else { "Created" },
                fmt_date(&date),
                fmt_money(balance, store.settings()?.currency)
            );
        }
        Some(("clear", _)) => match store.clear_checkpoint()? {
            Some(_) => println!("Checkpoint cleared"),
            None => println!("No checkpoint set"),
        },
        Some(("show", _)) => match store.state().checkpoint {
            Some(cp) => println!(
                "Checkpoint {}: {}",
                fmt_date(&cp.date),
                fmt_money(cp.balance, store.settings()?.currency)
            ),
            None => println!("No checkpoint set"),
        },
        _ => {}
    }
    Ok(())
}
