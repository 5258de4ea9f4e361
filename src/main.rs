// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use apate::state::PlanStore;
use apate::storage::SqliteStorage;
use apate::{cli, commands, db, log};

fn run(matches: &clap::ArgMatches) -> Result<()> {
    let storage = SqliteStorage::open_default()?;
    let mut store = PlanStore::open(storage)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("price", sub)) => commands::prices::handle(&mut store, sub)?,
        Some(("fund", sub)) => commands::funds::handle(&mut store, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut store, sub)?,
        Some(("checkpoint", sub)) => commands::checkpoint::handle(&mut store, sub)?,
        Some(("timeline", sub)) => commands::timeline::handle(&store, sub)?,
        Some(("report", sub)) => commands::reports::handle(&store, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut store, sub)?,
        Some(("config", sub)) => commands::config::handle(&mut store, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&store)?,
        Some(("reset", _)) => {
            tracing::warn!(
                transactions = store.state().transactions.len(),
                "discarding saved plan"
            );
            store.reset_state()?;
            println!("Plan reset to defaults");
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    log::init_logging(matches.get_flag("verbose"));

    if let Err(e) = run(&matches) {
        tracing::error!(error = %e, "command failed");
        return Err(e);
    }
    Ok(())
}
