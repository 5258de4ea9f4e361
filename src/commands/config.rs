// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::labels::{Currency, Language};
use crate::state::PlanStore;
use crate::storage::Storage;
use crate::utils::{pretty_table, required_arg};
use anyhow::{Result, anyhow};

pub fn handle<S: Storage>(store: &mut PlanStore<S>, m: &clap::ArgMatches) -> Result<()> {
    let mut settings = store.settings()?;
    match m.subcommand() {
        Some(("show", _)) => {
            println!(
                "{}",
                pretty_table(
                    &["Setting", "Value"],
                    vec![
                        vec!["language".into(), settings.language.code().into()],
                        vec![
                            "currency".into(),
                            format!(
                                "{} ({})",
                                settings.currency.code(),
                                settings.currency.symbol()
                            ),
                        ],
                    ],
                )
            );
        }
        Some(("language", sub)) => {
            let code = required_arg(sub, "code")?;
            settings.language = Language::parse(code)
                .ok_or_else(|| anyhow!("Unknown language '{}' (use he|en)", code))?;
            store.save_settings(&settings)?;
            println!("Language set to {}", settings.language.code());
        }
        Some(("currency", sub)) => {
            let code = required_arg(sub, "code")?;
            settings.currency = Currency::parse(code)
                .ok_or_else(|| anyhow!("Unknown currency '{}' (use ILS|USD|EUR)", code))?;
            store.save_settings(&settings)?;
            println!("Currency set to {}", settings.currency.code());
        }
        _ => {}
    }
    Ok(())
}
