// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use apate::commands::timeline::table_rows;
use apate::labels::{Currency, Labels, Language};
use apate::models::{
    Amount, Checkpoint, PriceBase, PriceConfigUpdate, Schedule, Transaction, TransactionKind,
};
use apate::state::PlanStore;
use apate::storage::MemoryStorage;
use chrono::{DateTime, TimeZone, Utc};

fn day(m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, m, d, 0, 0, 0).unwrap()
}

fn payment(id: &str, amount: f64, date: DateTime<Utc>) -> Transaction {
    Transaction {
        id: id.into(),
        kind: TransactionKind::Payment,
        amount: Amount::Fixed { amount },
        schedule: Schedule::Single { date },
        description: None,
        category: None,
    }
}

fn plan() -> PlanStore<MemoryStorage> {
    let mut store = PlanStore::open(MemoryStorage::new()).unwrap();
    store.set_fund("cash", 100_000.0).unwrap();
    store
}

#[test]
fn single_payment_reduces_the_opening_balance() {
    let mut store = plan();
    store.add_transaction(payment("p1", 20_000.0, day(3, 1))).unwrap();

    let timeline = store.timeline(&Labels::for_language(Language::En));
    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline[0].description, "Initial balance");
    assert_eq!(timeline[0].running_balance, 100_000.0);
    assert_eq!(timeline[1].description, "Payment");
    assert_eq!(timeline[1].amount, -20_000.0);
    assert_eq!(timeline[1].running_balance, 80_000.0);
}

#[test]
fn checkpoint_rebases_later_entries_and_archives_earlier_ones() {
    let mut store = plan();
    store.add_transaction(payment("p1", 20_000.0, day(1, 1))).unwrap();
    store.add_transaction(payment("p2", 10_000.0, day(3, 1))).unwrap();
    store
        .set_checkpoint(Checkpoint {
            date: day(2, 1),
            balance: 75_000.0,
        })
        .unwrap();

    let timeline = store.timeline(&Labels::for_language(Language::En));
    let balances: Vec<f64> = timeline.iter().map(|e| e.running_balance).collect();
    assert_eq!(balances, vec![100_000.0, 80_000.0, 75_000.0, 65_000.0]);
    let archived: Vec<bool> = timeline.iter().map(|e| e.is_archived).collect();
    assert_eq!(archived, vec![true, true, false, false]);
    assert!(timeline[2].is_checkpoint);
    assert_eq!(timeline[2].amount, -5_000.0);
}

#[test]
fn each_entry_adds_its_amount_to_the_previous_balance() {
    let mut store = plan();
    store
        .update_price_config(PriceConfigUpdate {
            buy_price: Some(Some(2_000_000.0)),
            sell_price: Some(Some(1_500_000.0)),
        })
        .unwrap();
    store.add_transaction(payment("p1", 20_000.0, day(1, 10))).unwrap();
    store
        .add_transaction(Transaction {
            id: "sale".into(),
            kind: TransactionKind::Income,
            amount: Amount::Percentage {
                amount: 10.0,
                base: PriceBase::Sell,
            },
            schedule: Schedule::Single { date: day(2, 1) },
            description: Some("Deposit".into()),
            category: None,
        })
        .unwrap();
    store.add_transaction(payment("p2", 5_000.0, day(1, 10))).unwrap();
    store
        .set_checkpoint(Checkpoint {
            date: day(1, 20),
            balance: 70_000.0,
        })
        .unwrap();

    let timeline = store.timeline(&Labels::default());
    assert_eq!(timeline[0].amount, timeline[0].running_balance);
    for pair in timeline.windows(2) {
        assert!(pair[0].date <= pair[1].date);
        assert!((pair[0].running_balance + pair[1].amount - pair[1].running_balance).abs() < 1e-6);
    }
    assert_eq!(timeline.last().unwrap().running_balance, 220_000.0);
    assert_eq!(store.summary().total_income, 150_000.0);
}

#[test]
fn table_leaves_the_opening_amount_blank() {
    let mut store = plan();
    store.add_transaction(payment("p1", 250_000.0, day(3, 1))).unwrap();

    let rows = table_rows(&store.timeline(&Labels::default()), Currency::Ils);
    assert_eq!(rows[0][3], "");
    assert_eq!(rows[0][4], "100,000₪");
    assert_eq!(rows[1][0], "01/03/2025");
    assert_eq!(rows[1][3], "-250,000₪");
    assert_eq!(rows[1][5], "negative");
}
