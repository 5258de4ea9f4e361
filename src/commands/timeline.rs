// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::chart::{ChartAxis, chart_points, render_text};
use crate::labels::{Currency, Headings};
use crate::models::TimelineEntry;
use crate::state::PlanStore;
use crate::storage::Storage;
use crate::utils::{fmt_date, fmt_money, fmt_money_signed, maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle<S: Storage>(store: &PlanStore<S>, m: &clap::ArgMatches) -> Result<()> {
    let settings = store.settings()?;
    let timeline = store.timeline(&store.labels()?);

    if m.get_flag("chart") {
        let axis = if m.get_flag("by-date") {
            ChartAxis::Date
        } else {
            ChartAxis::Event
        };
        let points = chart_points(&timeline, axis);
        if !maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &points)? {
            let width = m.get_one::<usize>("width").copied().unwrap_or(40);
            print!("{}", render_text(&points, width));
        }
        return Ok(());
    }

    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &timeline)? {
        return Ok(());
    }
    let h = Headings::for_language(settings.language);
    println!(
        "{}",
        pretty_table(
            &[h.date, h.description, h.category, h.amount, h.balance, ""],
            table_rows(&timeline, settings.currency),
        )
    );
    Ok(())
}

/// The first row is the opening balance and shows no amount.
pub fn table_rows(timeline: &[TimelineEntry], ccy: Currency) -> Vec<Vec<String>> {
    timeline
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let amount = if i == 0 && !e.is_checkpoint {
                String::new()
            } else {
                fmt_money_signed(e.amount, ccy)
            };
            let mut flags = Vec::new();
            if e.is_checkpoint {
                flags.push("checkpoint");
            }
            if e.is_archived {
                flags.push("archived");
            }
            if e.running_balance < 0.0 {
                flags.push("negative");
            }
            vec![
                fmt_date(&e.date),
                e.description.clone(),
                e.category.clone().unwrap_or_else(|| "-".into()),
                amount,
                fmt_money(e.running_balance, ccy),
                flags.join(","),
            ]
        })
        .collect()
}
