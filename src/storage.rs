// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Persistence port for the plan state and display settings.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use tracing::debug;

use crate::db;
use crate::labels::{Currency, Language, Settings};
use crate::models::{
    Amount, AppState, Checkpoint, InitialFunds, Installment, PriceBase, PriceConfig, Schedule,
    Transaction, TransactionKind,
};
use crate::snapshot::FORMAT_VERSION;

pub trait Storage {
    /// `None` until a state has been saved at least once.
    fn load_state(&self) -> Result<Option<AppState>>;
    fn save_state(&mut self, state: &AppState) -> Result<()>;
    fn clear_state(&mut self) -> Result<()>;
    fn load_settings(&self) -> Result<Settings>;
    fn save_settings(&mut self, settings: &Settings) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: Option<AppState>,
    settings: Settings,
    saves: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            state: Some(state),
            ..Self::default()
        }
    }

    pub fn saved(&self) -> Option<&AppState> {
        self.state.as_ref()
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl Storage for MemoryStorage {
    fn load_state(&self) -> Result<Option<AppState>> {
        Ok(self.state.clone())
    }

    fn save_state(&mut self, state: &AppState) -> Result<()> {
        self.state = Some(state.clone());
        self.saves += 1;
        Ok(())
    }

    fn clear_state(&mut self) -> Result<()> {
        self.state = None;
        Ok(())
    }

    fn load_settings(&self) -> Result<Settings> {
        Ok(self.settings)
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        self.settings = *settings;
        Ok(())
    }
}

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub fn open_default() -> Result<Self> {
        Ok(Self {
            conn: db::open_or_init()?,
        })
    }

    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            conn: db::open_at(path)?,
        })
    }

    pub fn in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        db::init_schema(&mut conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn fmt_ts(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .with_context(|| format!("Invalid stored date '{}'", raw))
}

fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

fn put_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

fn get_price(conn: &Connection, key: &str) -> Result<Option<f64>> {
    match get_setting(conn, key)? {
        Some(s) => Ok(Some(
            s.parse::<f64>()
                .with_context(|| format!("Invalid stored price '{}' for {}", s, key))?,
        )),
        None => Ok(None),
    }
}

fn load_installments(conn: &Connection, tx_id: &str) -> Result<Vec<Installment>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, percentage FROM installments WHERE transaction_id=?1 ORDER BY position",
    )?;
    let rows = stmt.query_map(params![tx_id], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, f64>(2)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, date, percentage) = row?;
        out.push(Installment {
            id,
            date: parse_ts(&date)?,
            percentage,
        });
    }
    Ok(out)
}

impl Storage for SqliteStorage {
    fn load_state(&self) -> Result<Option<AppState>> {
        if get_setting(&self.conn, "state_version")?.is_none() {
            return Ok(None);
        }

        let price_config = PriceConfig {
            buy_price: get_price(&self.conn, "buy_price")?,
            sell_price: get_price(&self.conn, "sell_price")?,
        };

        let mut initial_funds = InitialFunds::new();
        let mut stmt = self
            .conn
            .prepare("SELECT name, amount FROM initial_funds ORDER BY position")?;
        let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, f64>(1)?)))?;
        for row in rows {
            let (name, amount) = row?;
            initial_funds.set(&name, amount);
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, kind, date, amount_type, amount, percentage_base, description, category
             FROM transactions ORDER BY position",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok((
                r.get::<_, String>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, f64>(4)?,
                r.get::<_, Option<String>>(5)?,
                r.get::<_, Option<String>>(6)?,
                r.get::<_, Option<String>>(7)?,
            ))
        })?;
        let mut transactions = Vec::new();
        for row in rows {
            let (id, kind, date, amount_type, amount, base, description, category) = row?;
            let kind = TransactionKind::parse(&kind)
                .ok_or_else(|| anyhow!("Invalid stored kind '{}' for {}", kind, id))?;
            let amount = match amount_type.as_str() {
                "fixed" => Amount::Fixed { amount },
                "percentage" => Amount::Percentage {
                    amount,
                    base: base
                        .as_deref()
                        .and_then(PriceBase::parse)
                        .unwrap_or(PriceBase::Sell),
                },
                other => return Err(anyhow!("Invalid stored amount type '{}' for {}", other, id)),
            };
            let date = parse_ts(&date)?;
            let installments = load_installments(&self.conn, &id)?;
            let schedule = if installments.is_empty() {
                Schedule::Single { date }
            } else {
                Schedule::Installments {
                    start_date: date,
                    installments,
                }
            };
            transactions.push(Transaction {
                id,
                kind,
                amount,
                schedule,
                description,
                category,
            });
        }

        let checkpoint: Option<(String, f64)> = self
            .conn
            .query_row("SELECT date, balance FROM checkpoint WHERE id=1", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .optional()?;
        let checkpoint = match checkpoint {
            Some((date, balance)) => Some(Checkpoint {
                date: parse_ts(&date)?,
                balance,
            }),
            None => None,
        };

        debug!(
            transactions = transactions.len(),
            funds = initial_funds.len(),
            "loaded plan from sqlite"
        );
        Ok(Some(AppState {
            price_config,
            initial_funds,
            transactions,
            checkpoint,
        }))
    }

    fn save_state(&mut self, state: &AppState) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(
            "DELETE FROM installments;
             DELETE FROM transactions;
             DELETE FROM initial_funds;
             DELETE FROM checkpoint;
             DELETE FROM settings WHERE key IN ('buy_price', 'sell_price');",
        )?;
        put_setting(&tx, "state_version", FORMAT_VERSION)?;
        if let Some(p) = state.price_config.buy_price {
            put_setting(&tx, "buy_price", &p.to_string())?;
        }
        if let Some(p) = state.price_config.sell_price {
            put_setting(&tx, "sell_price", &p.to_string())?;
        }

        for (i, (name, amount)) in state.initial_funds.iter().enumerate() {
            tx.execute(
                "INSERT INTO initial_funds(position, name, amount) VALUES (?1, ?2, ?3)",
                params![i as i64, name, amount],
            )?;
        }

        for (i, t) in state.transactions.iter().enumerate() {
            let (amount_type, base) = match t.amount {
                Amount::Fixed { .. } => ("fixed", None),
                Amount::Percentage { base, .. } => ("percentage", Some(base.as_str())),
            };
            tx.execute(
                "INSERT INTO transactions(id, position, kind, date, amount_type, amount,
                                          percentage_base, description, category)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    t.id,
                    i as i64,
                    t.kind.as_str(),
                    fmt_ts(&t.date()),
                    amount_type,
                    t.amount.raw(),
                    base,
                    t.description,
                    t.category
                ],
            )
            .with_context(|| format!("Save transaction {}", t.id))?;
            for (j, inst) in t.schedule.installments().iter().enumerate() {
                tx.execute(
                    "INSERT INTO installments(id, transaction_id, position, date, percentage)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![inst.id, t.id, j as i64, fmt_ts(&inst.date), inst.percentage],
                )?;
            }
        }

        if let Some(cp) = state.checkpoint {
            tx.execute(
                "INSERT INTO checkpoint(id, date, balance) VALUES (1, ?1, ?2)",
                params![fmt_ts(&cp.date), cp.balance],
            )?;
        }
        tx.commit()?;
        debug!(transactions = state.transactions.len(), "saved plan to sqlite");
        Ok(())
    }

    fn clear_state(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "DELETE FROM installments;
             DELETE FROM transactions;
             DELETE FROM initial_funds;
             DELETE FROM checkpoint;
             DELETE FROM settings WHERE key IN ('buy_price', 'sell_price', 'state_version');",
        )?;
        Ok(())
    }

    fn load_settings(&self) -> Result<Settings> {
        let mut settings = Settings::default();
        if let Some(lang) = get_setting(&self.conn, "language")? {
            settings.language = Language::parse(&lang)
                .ok_or_else(|| anyhow!("Invalid stored language '{}'", lang))?;
        }
        if let Some(ccy) = get_setting(&self.conn, "currency")? {
            settings.currency = Currency::parse(&ccy)
                .ok_or_else(|| anyhow!("Invalid stored currency '{}'", ccy))?;
        }
        Ok(settings)
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        put_setting(&self.conn, "language", settings.language.code())?;
        put_setting(&self.conn, "currency", settings.currency.code())?;
        Ok(())
    }
}
