// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::PriceConfigUpdate;
use crate::state::PlanStore;
use crate::storage::Storage;
use crate::utils::{fmt_money, maybe_print_json, parse_amount, pretty_table};
use anyhow::Result;

pub fn handle<S: Storage>(store: &mut PlanStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(store, sub)?,
        Some(("clear", sub)) => clear(store, sub)?,
        Some(("show", sub)) => show(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn set<S: Storage>(store: &mut PlanStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let mut update = PriceConfigUpdate::default();
    if let Some(buy) = sub.get_one::<String>("buy") {
        update.buy_price = Some(Some(parse_amount(buy)?));
    }
    if let Some(sell) = sub.get_one::<String>("sell") {
        update.sell_price = Some(Some(parse_amount(sell)?));
    }
    store.update_price_config(update)?;
    println!("Prices updated");
    Ok(())
}

fn clear<S: Storage>(store: &mut PlanStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let (buy, sell) = (sub.get_flag("buy"), sub.get_flag("sell"));
    // no flag clears both
    let both = !buy && !sell;
    let update = PriceConfigUpdate {
        buy_price: (buy || both).then_some(None),
        sell_price: (sell || both).then_some(None),
    };
    store.update_price_config(update)?;
    println!("Prices cleared");
    Ok(())
}

fn show<S: Storage>(store: &PlanStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let prices = store.state().price_config;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &prices)? {
        return Ok(());
    }
    let ccy = store.settings()?.currency;
    let fmt = |p: Option<f64>| p.map(|v| fmt_money(v, ccy)).unwrap_or_else(|| "-".into());
    println!(
        "{}",
        pretty_table(
            &["Price", "Amount"],
            vec![
                vec!["buy".into(), fmt(prices.buy_price)],
                vec!["sell".into(), fmt(prices.sell_price)],
            ],
        )
    );
    Ok(())
}
