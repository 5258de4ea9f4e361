// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Apate", "apate"));

/// Overrides the database location, mostly for scripted runs.
pub const DB_ENV: &str = "APATE_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Ok(custom) = std::env::var(DB_ENV) {
        if !custom.trim().is_empty() {
            return Ok(PathBuf::from(custom.trim()));
        }
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("apate.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    open_at(&db_path()?)
}

pub fn open_at(path: &Path) -> Result<Connection> {
    let mut conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS initial_funds(
        position INTEGER NOT NULL,
        name TEXT PRIMARY KEY,
        amount REAL NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id TEXT PRIMARY KEY,
        position INTEGER NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('income','payment')),
        date TEXT NOT NULL,
        amount_type TEXT NOT NULL CHECK(amount_type IN ('fixed','percentage')),
        amount REAL NOT NULL,
        percentage_base TEXT CHECK(percentage_base IN ('buy','sell')),
        description TEXT,
        category TEXT
    );

    CREATE TABLE IF NOT EXISTS installments(
        id TEXT NOT NULL,
        transaction_id TEXT NOT NULL,
        position INTEGER NOT NULL,
        date TEXT NOT NULL,
        percentage REAL NOT NULL,
        PRIMARY KEY(transaction_id, id),
        FOREIGN KEY(transaction_id) REFERENCES transactions(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_installments_tx ON installments(transaction_id, position);

    -- at most one checkpoint
    CREATE TABLE IF NOT EXISTS checkpoint(
        id INTEGER PRIMARY KEY CHECK(id = 1),
        date TEXT NOT NULL,
        balance REAL NOT NULL
    );
    "#,
    )?;
    Ok(())
}
