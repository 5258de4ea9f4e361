// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Balance chart data. The timeline produces the points; rendering here is a
//! plain text bar chart for the terminal.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::TimelineEntry;
use crate::utils::{fmt_compact, fmt_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartAxis {
    /// One point per timeline entry.
    Event,
    /// One point per calendar day, holding that day's closing balance.
    Date,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub date: DateTime<Utc>,
    pub label: String,
    pub balance: f64,
}

pub fn chart_points(timeline: &[TimelineEntry], axis: ChartAxis) -> Vec<ChartPoint> {
    let mut points: Vec<ChartPoint> = Vec::with_capacity(timeline.len());
    for entry in timeline {
        if axis == ChartAxis::Date {
            if let Some(last) = points.last_mut() {
                if last.date.date_naive() == entry.date.date_naive() {
                    last.date = entry.date;
                    last.label = entry.description.clone();
                    last.balance = entry.running_balance;
                    continue;
                }
            }
        }
        points.push(ChartPoint {
            date: entry.date,
            label: entry.description.clone(),
            balance: entry.running_balance,
        });
    }
    points
}

/// Horizontal bars around a zero line; negative balances grow to the left.
pub fn render_text(points: &[ChartPoint], width: usize) -> String {
    let width = width.max(10);
    let max_pos = points.iter().map(|p| p.balance).fold(0.0_f64, f64::max);
    let max_neg = points.iter().map(|p| -p.balance).fold(0.0_f64, f64::max);
    let span = max_pos + max_neg;
    if points.is_empty() || span == 0.0 {
        return points
            .iter()
            .map(|p| format!("{}  | {}\n", fmt_date(&p.date), fmt_compact(p.balance)))
            .collect();
    }
    let left = ((max_neg / span) * width as f64).round() as usize;
    let right = width - left;

    let mut out = String::new();
    for p in points {
        let (neg, pos) = if p.balance < 0.0 {
            (((-p.balance / span) * width as f64).round() as usize, 0)
        } else {
            (0, ((p.balance / span) * width as f64).round() as usize)
        };
        let neg = neg.min(left);
        let pos = pos.min(right);
        out.push_str(&format!(
            "{} {}{}|{}{} {}\n",
            fmt_date(&p.date),
            " ".repeat(left - neg),
            "▒".repeat(neg),
            "█".repeat(pos),
            " ".repeat(right - pos),
            fmt_compact(p.balance)
        ));
    }
    out
}
