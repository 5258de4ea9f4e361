// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use comfy_table::{Cell, Table, presets::UTF8_FULL};

use crate::labels::Currency;

pub fn required_arg<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a str> {
    m.get_one::<String>(name)
        .map(|s| s.as_str())
        .ok_or_else(|| anyhow!("Missing --{}", name))
}

/// Accepts `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp.
/// Precision is cut to milliseconds, the resolution dates are stored at.
pub fn parse_date(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = d.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc).trunc_subsecs(3))
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
    let v = cleaned
        .parse::<f64>()
        .with_context(|| format!("Invalid amount '{}'", s))?;
    if !v.is_finite() {
        return Err(anyhow!("Invalid amount '{}'", s));
    }
    Ok(v)
}

/// Parses `DATE:PERCENT`, e.g. `2025-03-01:25`.
pub fn parse_installment(s: &str) -> Result<(DateTime<Utc>, f64)> {
    let (date, pct) = s
        .rsplit_once(':')
        .filter(|(d, _)| !d.contains('T'))
        .ok_or_else(|| anyhow!("Invalid installment '{}', expected YYYY-MM-DD:PERCENT", s))?;
    Ok((parse_date(date)?, parse_amount(pct)?))
}

fn group_thousands(whole: u64) -> String {
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn whole_units(amount: f64) -> String {
    group_thousands(amount.abs().round() as u64)
}

/// `-1,234₪` style: whole units, sign only when negative.
pub fn fmt_money(amount: f64, ccy: Currency) -> String {
    let sign = if amount < 0.0 && amount.abs().round() > 0.0 { "-" } else { "" };
    format!("{}{}{}", sign, whole_units(amount), ccy.symbol())
}

/// Like [`fmt_money`] but positive amounts get a leading `+`.
pub fn fmt_money_signed(amount: f64, ccy: Currency) -> String {
    let units = whole_units(amount);
    let sign = if units == "0" {
        ""
    } else if amount > 0.0 {
        "+"
    } else {
        "-"
    };
    format!("{}{}{}", sign, units, ccy.symbol())
}

pub fn fmt_date(date: &DateTime<Utc>) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Axis-style amount: `1.5M`, `250K`, `-900`.
pub fn fmt_compact(value: f64) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    if abs >= 1_000_000.0 {
        format!("{}{:.1}M", sign, abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{}{:.0}K", sign, abs / 1_000.0)
    } else {
        format!("{}{:.0}", sign, abs)
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
