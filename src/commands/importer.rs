// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::snapshot::import_json;
use crate::state::PlanStore;
use crate::storage::Storage;
use crate::utils::required_arg;
use anyhow::{Context, Result};
use tracing::{debug, info};

pub fn handle<S: Storage>(store: &mut PlanStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("state", sub)) => import_state(store, sub),
        _ => Ok(()),
    }
}

fn import_state<S: Storage>(store: &mut PlanStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let path = required_arg(sub, "path")?.trim();
    let raw = std::fs::read_to_string(path).with_context(|| format!("Read {}", path))?;
    debug!(path, bytes = raw.len(), "read plan document");
    let state = import_json(&raw)?;
    let count = state.transactions.len();
    store.load_state(state)?;
    info!(path, transactions = count, "plan imported");
    println!("Imported plan from {} ({} transactions)", path, count);
    Ok(())
}
