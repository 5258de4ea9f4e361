// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::query_rows;
use crate::labels::{Currency, Headings, Labels, Settings};
use crate::models::{Amount, AppState, PriceBase, SummaryStats, TimelineEntry, TransactionKind};
use crate::snapshot::export_json;
use crate::state::PlanStore;
use crate::storage::Storage;
use crate::utils::{fmt_date, fmt_money, fmt_money_signed, required_arg};
use anyhow::{Context, Result, bail};
use serde_json::json;
use std::path::Path;
use tracing::{debug, info};

pub fn handle<S: Storage>(store: &PlanStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("timeline", sub)) => export_timeline(store, sub),
        Some(("summary", sub)) => export_summary(store, sub),
        Some(("transactions", sub)) => export_transactions(store, sub),
        Some(("sheets", sub)) => export_sheets(store, sub),
        Some(("state", sub)) => export_state(store, sub),
        _ => Ok(()),
    }
}

fn output_format(sub: &clap::ArgMatches) -> Result<String> {
    let fmt = required_arg(sub, "format")?.to_lowercase();
    match fmt.as_str() {
        "csv" | "json" => Ok(fmt),
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
}

fn write_csv(path: &Path, rows: &[Vec<String>]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "writing csv");
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Create {}", path.display()))?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, v: &T) -> Result<()> {
    debug!(path = %path.display(), "writing json");
    std::fs::write(path, serde_json::to_string_pretty(v)?)
        .with_context(|| format!("Write {}", path.display()))
}

pub fn summary_sheet(
    state: &AppState,
    stats: &SummaryStats,
    h: &Headings,
    ccy: Currency,
) -> Vec<Vec<String>> {
    let price = |p: Option<f64>| p.map(|v| fmt_money(v, ccy)).unwrap_or_else(|| h.not_set.into());
    let mut rows = vec![
        vec![h.title.to_string()],
        vec![String::new()],
        vec![h.prices.to_string()],
        vec![h.buy_price.to_string(), price(state.price_config.buy_price)],
        vec![h.sell_price.to_string(), price(state.price_config.sell_price)],
        vec![String::new()],
        vec![h.initial_funds.to_string()],
    ];
    for (name, amount) in state.initial_funds.iter() {
        rows.push(vec![name.to_string(), fmt_money(amount, ccy)]);
    }
    rows.extend([
        vec![h.total_initial.to_string(), fmt_money(stats.total_initial, ccy)],
        vec![String::new()],
        vec![h.summary.to_string()],
        vec![h.total_income.to_string(), fmt_money(stats.total_income, ccy)],
        vec![h.total_payments.to_string(), fmt_money(stats.total_payments, ccy)],
        vec![h.final_balance.to_string(), fmt_money(stats.final_balance, ccy)],
    ]);
    rows
}

pub fn timeline_sheet(timeline: &[TimelineEntry], h: &Headings, ccy: Currency) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        h.date.to_string(),
        h.description.to_string(),
        h.category.to_string(),
        h.amount.to_string(),
        h.balance.to_string(),
    ]];
    for e in timeline {
        rows.push(vec![
            fmt_date(&e.date),
            e.description.clone(),
            e.category.clone().unwrap_or_else(|| "-".into()),
            fmt_money_signed(e.amount, ccy),
            fmt_money(e.running_balance, ccy),
        ]);
    }
    rows
}

pub fn transactions_sheet(
    state: &AppState,
    h: &Headings,
    labels: &Labels,
    ccy: Currency,
) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        h.date.to_string(),
        h.kind.to_string(),
        h.description.to_string(),
        h.category.to_string(),
        h.amount.to_string(),
        h.amount_type.to_string(),
        h.percentage_base.to_string(),
    ]];
    for t in &state.transactions {
        let (amount, amount_type, base) = match t.amount {
            Amount::Fixed { amount } => (fmt_money(amount, ccy), h.fixed, "-"),
            Amount::Percentage { amount, base } => (
                format!("{}%", amount),
                h.percentage,
                match base {
                    PriceBase::Buy => h.buy_price,
                    PriceBase::Sell => h.sell_price,
                },
            ),
        };
        let kind = match t.kind {
            TransactionKind::Income => labels.income.as_str(),
            TransactionKind::Payment => labels.payment.as_str(),
        };
        rows.push(vec![
            fmt_date(&t.date()),
            kind.to_string(),
            t.description.clone().unwrap_or_else(|| "-".into()),
            t.category.clone().unwrap_or_else(|| "-".into()),
            amount,
            amount_type.to_string(),
            base.to_string(),
        ]);
    }
    rows
}

fn sheet_context<S: Storage>(store: &PlanStore<S>) -> Result<(Settings, Headings, Labels)> {
    let settings = store.settings()?;
    Ok((
        settings,
        Headings::for_language(settings.language),
        Labels::for_language(settings.language),
    ))
}

fn export_timeline<S: Storage>(store: &PlanStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = output_format(sub)?;
    let out = Path::new(required_arg(sub, "out")?);
    let (settings, h, labels) = sheet_context(store)?;
    let timeline = store.timeline(&labels);
    if fmt == "csv" {
        write_csv(out, &timeline_sheet(&timeline, &h, settings.currency))?;
    } else {
        write_json(out, &timeline)?;
    }
    println!("Exported timeline to {}", out.display());
    Ok(())
}

fn export_summary<S: Storage>(store: &PlanStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = output_format(sub)?;
    let out = Path::new(required_arg(sub, "out")?);
    let (settings, h, _) = sheet_context(store)?;
    let state = store.state();
    let stats = store.summary();
    if fmt == "csv" {
        write_csv(out, &summary_sheet(state, &stats, &h, settings.currency))?;
    } else {
        write_json(
            out,
            &json!({
                "priceConfig": state.price_config,
                "initialFunds": state.initial_funds,
                "summary": stats,
            }),
        )?;
    }
    println!("Exported summary to {}", out.display());
    Ok(())
}

fn export_transactions<S: Storage>(store: &PlanStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = output_format(sub)?;
    let out = Path::new(required_arg(sub, "out")?);
    let (settings, h, labels) = sheet_context(store)?;
    if fmt == "csv" {
        write_csv(
            out,
            &transactions_sheet(store.state(), &h, &labels, settings.currency),
        )?;
    } else {
        write_json(out, &query_rows(&store.state().transactions, settings.currency))?;
    }
    println!("Exported transactions to {}", out.display());
    Ok(())
}

fn export_sheets<S: Storage>(store: &PlanStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let dir = Path::new(required_arg(sub, "dir")?.trim());
    std::fs::create_dir_all(dir).with_context(|| format!("Create {}", dir.display()))?;
    let (settings, h, labels) = sheet_context(store)?;
    let ccy = settings.currency;
    let state = store.state();
    write_csv(
        &dir.join("summary.csv"),
        &summary_sheet(state, &store.summary(), &h, ccy),
    )?;
    write_csv(
        &dir.join("timeline.csv"),
        &timeline_sheet(&store.timeline(&labels), &h, ccy),
    )?;
    write_csv(
        &dir.join("transactions.csv"),
        &transactions_sheet(state, &h, &labels, ccy),
    )?;
    info!(dir = %dir.display(), "sheets exported");
    println!("Exported sheets to {}", dir.display());
    Ok(())
}

fn export_state<S: Storage>(store: &PlanStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let out = Path::new(required_arg(sub, "out")?);
    let json = export_json(store.state())?;
    std::fs::write(out, json).with_context(|| format!("Write {}", out.display()))?;
    info!(
        path = %out.display(),
        transactions = store.state().transactions.len(),
        "plan exported"
    );
    println!("Exported plan to {}", out.display());
    Ok(())
}
