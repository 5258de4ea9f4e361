// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use apate::labels::{Currency, Language, Settings};
use apate::models::{
    Amount, AppState, Checkpoint, Installment, PriceBase, PriceConfig, Schedule, Transaction,
    TransactionKind,
};
use apate::state::PlanStore;
use apate::utils::parse_date;
use apate::storage::{SqliteStorage, Storage};
use chrono::{TimeZone, Utc};
use tempfile::tempdir;

fn sample_state() -> AppState {
    let d = |m, day| Utc.with_ymd_and_hms(2025, m, day, 0, 0, 0).unwrap();
    let mut state = AppState::default();
    state.price_config = PriceConfig {
        buy_price: Some(2_100_000.0),
        sell_price: None,
    };
    state.initial_funds.set("cash", 150_000.0);
    state.initial_funds.set("pension", 20_000.5);
    state.transactions.push(Transaction {
        id: "t-1".into(),
        kind: TransactionKind::Payment,
        amount: Amount::Percentage {
            amount: 25.0,
            base: PriceBase::Buy,
        },
        schedule: Schedule::Installments {
            start_date: d(1, 1),
            installments: vec![
                Installment {
                    id: "i-1".into(),
                    date: d(1, 15),
                    percentage: 40.0,
                },
                Installment {
                    id: "i-2".into(),
                    date: d(4, 15),
                    percentage: 60.0,
                },
            ],
        },
        description: Some("Down payment".into()),
        category: None,
    });
    state.transactions.push(Transaction {
        id: "t-0".into(),
        kind: TransactionKind::Income,
        amount: Amount::Fixed { amount: 5_000.0 },
        schedule: Schedule::Single { date: d(2, 1) },
        description: None,
        category: Some("salary".into()),
    });
    state.checkpoint = Some(Checkpoint {
        date: d(3, 1),
        balance: 10_000.0,
    });
    state
}

#[test]
fn sqlite_round_trips_the_plan() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("apate.sqlite");
    let state = sample_state();

    {
        let mut storage = SqliteStorage::open(&path).unwrap();
        assert!(storage.load_state().unwrap().is_none());
        storage.save_state(&state).unwrap();
    }

    let storage = SqliteStorage::open(&path).unwrap();
    assert_eq!(storage.load_state().unwrap(), Some(state));
}

#[test]
fn store_reopens_with_saved_edits_and_resets_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("apate.sqlite");

    let mut store = PlanStore::open(SqliteStorage::open(&path).unwrap()).unwrap();
    store.set_fund("cash", 99.0).unwrap();
    store.remove_fund("other").unwrap();
    drop(store);

    let mut store = PlanStore::open(SqliteStorage::open(&path).unwrap()).unwrap();
    let names: Vec<&str> = store.state().initial_funds.iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["cash", "stocks"]);
    assert_eq!(store.state().initial_funds.get("cash"), Some(99.0));

    store.reset_state().unwrap();
    assert_eq!(store.state(), &AppState::default());
    assert!(store.storage().load_state().unwrap().is_none());
}

#[test]
fn settings_survive_a_state_reset() {
    let mut storage = SqliteStorage::in_memory().unwrap();
    assert_eq!(storage.load_settings().unwrap(), Settings::default());
    let settings = Settings {
        language: Language::En,
        currency: Currency::Eur,
    };
    storage.save_settings(&settings).unwrap();
    storage.save_state(&sample_state()).unwrap();
    storage.clear_state().unwrap();
    assert_eq!(storage.load_settings().unwrap(), settings);
    assert!(storage.load_state().unwrap().is_none());
}

#[test]
fn rejected_sqlite_save_leaves_memory_and_disk_in_step() {
    let mut store = PlanStore::open(SqliteStorage::in_memory().unwrap()).unwrap();
    store.set_fund("cash", 500.0).unwrap();
    let before = store.state().clone();

    let mut imported = sample_state();
    let dup = imported.transactions[1].clone();
    imported.transactions.push(dup);
    assert!(store.load_state(imported).is_err());

    assert_eq!(store.state(), &before);
    let rows: i64 = store
        .storage()
        .connection()
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows, 0);
    assert_eq!(store.storage().load_state().unwrap(), Some(before));
}

#[test]
fn fine_grained_dates_survive_a_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("apate.sqlite");
    let date = parse_date("2025-06-30T23:59:59.987654Z").unwrap();

    let mut store = PlanStore::open(SqliteStorage::open(&path).unwrap()).unwrap();
    store
        .set_checkpoint(Checkpoint {
            date,
            balance: -5_000.0,
        })
        .unwrap();
    let saved = store.state().clone();
    drop(store);

    let store = PlanStore::open(SqliteStorage::open(&path).unwrap()).unwrap();
    assert_eq!(store.state(), &saved);
}
