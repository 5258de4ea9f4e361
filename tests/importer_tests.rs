// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use apate::error::PlanError;
use apate::models::{Amount, Checkpoint, PriceBase, PriceConfigUpdate, Schedule};
use apate::snapshot::export_json;
use apate::state::PlanStore;
use apate::storage::MemoryStorage;
use apate::{cli, commands::importer};
use chrono::{TimeZone, Utc};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn run_import(store: &mut PlanStore<MemoryStorage>, path: &str) -> anyhow::Result<()> {
    let matches =
        cli::build_cli().try_get_matches_from(["apate", "import", "state", "--path", path])?;
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(store, import_m)
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn import_replaces_the_plan_with_an_exported_one() {
    let mut source = PlanStore::open(MemoryStorage::new()).unwrap();
    source.set_fund("stocks", 42_000.0).unwrap();
    source
        .update_price_config(PriceConfigUpdate {
            buy_price: Some(Some(1_800_000.0)),
            sell_price: None,
        })
        .unwrap();
    source
        .set_checkpoint(Checkpoint {
            date: Utc.with_ymd_and_hms(2025, 4, 1, 12, 30, 0).unwrap(),
            balance: 12_345.5,
        })
        .unwrap();

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(export_json(source.state()).unwrap().as_bytes())
        .unwrap();

    let mut target = PlanStore::open(MemoryStorage::new()).unwrap();
    run_import(&mut target, &file.path().to_string_lossy()).unwrap();
    assert_eq!(target.state(), source.state());
    assert_eq!(target.storage().saved(), Some(source.state()));
}

#[test]
fn import_accepts_documents_without_percentage_base() {
    let doc = r#"{
        "version": "1.0",
        "timestamp": "2025-01-01T00:00:00.000Z",
        "priceConfig": { "sellPrice": 2000000 },
        "initialFunds": { "cash": 5000 },
        "transactions": [{
            "id": "1700000000000",
            "type": "income",
            "date": "2025-02-01T00:00:00.000Z",
            "amountType": "percentage",
            "amount": 10,
            "isInstallment": true,
            "installments": [
                { "id": "a", "date": "2025-02-01T00:00:00.000Z", "percentage": 30 },
                { "id": "b", "date": "2025-05-01T00:00:00.000Z", "percentage": 70 }
            ]
        }]
    }"#;
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(doc.as_bytes()).unwrap();

    let mut store = PlanStore::open(MemoryStorage::new()).unwrap();
    run_import(&mut store, &file.path().to_string_lossy()).unwrap();

    let tx = &store.state().transactions[0];
    assert_eq!(
        tx.amount,
        Amount::Percentage {
            amount: 10.0,
            base: PriceBase::Sell
        }
    );
    assert!(matches!(
        &tx.schedule,
        Schedule::Installments { installments, .. } if installments.len() == 2
    ));
    assert_eq!(store.summary().total_income, 200_000.0);
}

#[test]
fn malformed_file_is_an_invalid_format_error() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"{ \"version\": \"1.0\", \"transactions\": 7 }")
        .unwrap();

    let mut store = PlanStore::open(MemoryStorage::new()).unwrap();
    let err = run_import(&mut store, &file.path().to_string_lossy()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PlanError>(),
        Some(PlanError::InvalidFormat(_))
    ));
    assert_eq!(store.storage().save_count(), 0);
}

#[test]
fn import_logs_the_loaded_plan() {
    let source = PlanStore::open(MemoryStorage::new()).unwrap();
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(export_json(source.state()).unwrap().as_bytes())
        .unwrap();
    let path = file.path().to_string_lossy().to_string();

    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let mut store = PlanStore::open(MemoryStorage::new()).unwrap();
    tracing::subscriber::with_default(subscriber, || run_import(&mut store, &path)).unwrap();

    let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(text.contains("loading plan"));
    assert!(text.contains("plan imported"));
}
