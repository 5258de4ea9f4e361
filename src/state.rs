// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The single owner of the plan. Commands mutate it through these methods;
//! each mutation is written through the injected [`Storage`].

use anyhow::Result;
use tracing::{debug, info};

use crate::error::PlanError;
use crate::labels::{Labels, Settings};
use crate::models::{
    AppState, Checkpoint, InitialFunds, PriceConfigUpdate, Schedule, SummaryStats, TimelineEntry,
    Transaction, TransactionPatch,
};
use crate::storage::Storage;
use crate::timeline::{generate_timeline, summary_stats};

/// Allowed distance of an installment set's total from 100%.
pub const PERCENTAGE_TOLERANCE: f64 = 0.01;

pub fn installment_total(tx: &Transaction) -> f64 {
    tx.schedule.installments().iter().map(|i| i.percentage).sum()
}

/// Checks applied before a transaction enters the plan. The timeline engine
/// itself trusts whatever it is given.
pub fn validate_transaction(tx: &Transaction) -> Result<(), PlanError> {
    if let Schedule::Installments { installments, .. } = &tx.schedule {
        if installments.is_empty() {
            return Err(PlanError::NoInstallments);
        }
        if let Some(bad) = installments
            .iter()
            .find(|i| !(i.percentage > 0.0 && i.percentage <= 100.0))
        {
            return Err(PlanError::InstallmentOutOfRange(bad.percentage));
        }
        let total = installment_total(tx);
        if (total - 100.0).abs() >= PERCENTAGE_TOLERANCE {
            return Err(PlanError::InstallmentSum(total));
        }
    }
    Ok(())
}

pub struct PlanStore<S: Storage> {
    state: AppState,
    storage: S,
}

impl<S: Storage> PlanStore<S> {
    /// Loads the saved plan, or starts from the default one.
    pub fn open(storage: S) -> Result<Self> {
        let state = match storage.load_state()? {
            Some(state) => state,
            None => {
                debug!("no saved plan, starting from defaults");
                AppState::default()
            }
        };
        Ok(Self { state, storage })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Saves `next`, then adopts it. On a save error the current plan is
    /// left as it was.
    fn commit(&mut self, next: AppState) -> Result<()> {
        self.storage.save_state(&next)?;
        self.state = next;
        Ok(())
    }

    pub fn settings(&self) -> Result<Settings> {
        self.storage.load_settings()
    }

    pub fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        self.storage.save_settings(settings)
    }

    pub fn labels(&self) -> Result<Labels> {
        Ok(Labels::for_language(self.settings()?.language))
    }

    pub fn update_price_config(&mut self, update: PriceConfigUpdate) -> Result<()> {
        let mut next = self.state.clone();
        next.price_config.apply(update);
        debug!(prices = ?next.price_config, "price config updated");
        self.commit(next)
    }

    pub fn set_fund(&mut self, name: &str, amount: f64) -> Result<()> {
        if amount < 0.0 {
            return Err(PlanError::NegativeFund {
                name: name.to_string(),
                amount,
            }
            .into());
        }
        let mut next = self.state.clone();
        next.initial_funds.set(name, amount);
        self.commit(next)
    }

    pub fn remove_fund(&mut self, name: &str) -> Result<f64> {
        let mut next = self.state.clone();
        let amount = next
            .initial_funds
            .remove(name)
            .ok_or_else(|| PlanError::FundNotFound(name.to_string()))?;
        self.commit(next)?;
        Ok(amount)
    }

    pub fn replace_initial_funds(&mut self, funds: InitialFunds) -> Result<()> {
        if let Some((name, amount)) = funds.iter().find(|(_, a)| *a < 0.0) {
            return Err(PlanError::NegativeFund {
                name: name.to_string(),
                amount,
            }
            .into());
        }
        let next = AppState {
            initial_funds: funds,
            ..self.state.clone()
        };
        self.commit(next)
    }

    pub fn add_transaction(&mut self, tx: Transaction) -> Result<()> {
        if self.state.transactions.iter().any(|t| t.id == tx.id) {
            return Err(PlanError::DuplicateTransaction(tx.id).into());
        }
        validate_transaction(&tx)?;
        debug!(id = %tx.id, kind = tx.kind.as_str(), "adding transaction");
        let mut next = self.state.clone();
        next.transactions.push(tx);
        self.commit(next)
    }

    pub fn update_transaction(&mut self, id: &str, patch: TransactionPatch) -> Result<()> {
        let idx = self.position(id)?;
        let mut next = self.state.clone();
        patch.apply_to(&mut next.transactions[idx]);
        validate_transaction(&next.transactions[idx])?;
        self.commit(next)
    }

    pub fn delete_transaction(&mut self, id: &str) -> Result<Transaction> {
        let idx = self.position(id)?;
        let mut next = self.state.clone();
        let removed = next.transactions.remove(idx);
        self.commit(next)?;
        Ok(removed)
    }

    fn position(&self, id: &str) -> Result<usize, PlanError> {
        self.state
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| PlanError::TransactionNotFound(id.to_string()))
    }

    pub fn set_checkpoint(&mut self, checkpoint: Checkpoint) -> Result<()> {
        let next = AppState {
            checkpoint: Some(checkpoint),
            ..self.state.clone()
        };
        self.commit(next)
    }

    pub fn clear_checkpoint(&mut self) -> Result<Option<Checkpoint>> {
        let old = self.state.checkpoint;
        let next = AppState {
            checkpoint: None,
            ..self.state.clone()
        };
        self.commit(next)?;
        Ok(old)
    }

    /// Replaces the whole plan, e.g. after an import. No validation happens here.
    pub fn load_state(&mut self, state: AppState) -> Result<()> {
        info!(transactions = state.transactions.len(), "loading plan");
        self.commit(state)
    }

    pub fn reset_state(&mut self) -> Result<()> {
        info!("resetting plan");
        self.storage.clear_state()?;
        self.state = AppState::default();
        Ok(())
    }

    pub fn timeline(&self, labels: &Labels) -> Vec<TimelineEntry> {
        generate_timeline(
            &self.state.initial_funds,
            &self.state.transactions,
            &self.state.price_config,
            labels,
            self.state.checkpoint.as_ref(),
        )
    }

    pub fn summary(&self) -> SummaryStats {
        summary_stats(
            &self.state.initial_funds,
            &self.state.transactions,
            &self.state.price_config,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amount, Installment, TransactionKind};
    use crate::storage::MemoryStorage;
    use chrono::{TimeZone, Utc};

    fn installment_tx(id: &str, pcts: &[f64]) -> Transaction {
        let d = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Transaction {
            id: id.into(),
            kind: TransactionKind::Payment,
            amount: Amount::Fixed { amount: 1000.0 },
            schedule: Schedule::Installments {
                start_date: d,
                installments: pcts
                    .iter()
                    .enumerate()
                    .map(|(i, p)| Installment {
                        id: format!("{}-{}", id, i),
                        date: d,
                        percentage: *p,
                    })
                    .collect(),
            },
            description: None,
            category: None,
        }
    }

    #[test]
    fn installment_sum_within_tolerance_is_accepted() {
        assert!(validate_transaction(&installment_tx("a", &[33.33, 33.33, 33.335])).is_ok());
        assert!(matches!(
            validate_transaction(&installment_tx("b", &[50.0, 49.0])),
            Err(PlanError::InstallmentSum(_))
        ));
        assert!(matches!(
            validate_transaction(&installment_tx("c", &[])),
            Err(PlanError::NoInstallments)
        ));
        assert!(matches!(
            validate_transaction(&installment_tx("d", &[120.0, -20.0])),
            Err(PlanError::InstallmentOutOfRange(_))
        ));
    }

    #[test]
    fn every_mutation_is_persisted() {
        let mut store = PlanStore::open(MemoryStorage::new()).unwrap();
        assert_eq!(store.state(), &AppState::default());
        store.set_fund("cash", 10.0).unwrap();
        store.add_transaction(installment_tx("a", &[100.0])).unwrap();
        store.delete_transaction("a").unwrap();
        assert_eq!(store.storage().save_count(), 3);
        assert_eq!(store.storage().saved(), Some(store.state()));
    }

    /// Accepts settings but refuses every state save.
    #[derive(Default)]
    struct ReadOnlyStorage;

    impl Storage for ReadOnlyStorage {
        fn load_state(&self) -> Result<Option<AppState>> {
            Ok(None)
        }

        fn save_state(&mut self, _state: &AppState) -> Result<()> {
            Err(anyhow::anyhow!("disk full"))
        }

        fn clear_state(&mut self) -> Result<()> {
            Ok(())
        }

        fn load_settings(&self) -> Result<Settings> {
            Ok(Settings::default())
        }

        fn save_settings(&mut self, _settings: &Settings) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_save_keeps_the_previous_plan() {
        let mut store = PlanStore::open(ReadOnlyStorage).unwrap();
        assert!(store.set_fund("cash", 10.0).is_err());
        assert!(store.add_transaction(installment_tx("a", &[100.0])).is_err());
        assert!(store.remove_fund("stocks").is_err());
        assert!(
            store
                .set_checkpoint(Checkpoint {
                    date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
                    balance: 1.0,
                })
                .is_err()
        );
        let mut imported = AppState::default();
        imported.transactions.push(installment_tx("b", &[100.0]));
        assert!(store.load_state(imported).is_err());
        assert_eq!(store.state(), &AppState::default());
    }

    #[test]
    fn replacing_funds_rejects_negative_amounts() {
        let mut store = PlanStore::open(MemoryStorage::new()).unwrap();
        let bad: InitialFunds = [("cash", 5.0), ("loan", -1.0)].into_iter().collect();
        assert!(store.replace_initial_funds(bad).is_err());
        let good: InitialFunds = [("savings", 7.5)].into_iter().collect();
        store.replace_initial_funds(good.clone()).unwrap();
        assert_eq!(store.state().initial_funds, good);
    }

    #[test]
    fn rejected_edits_leave_state_untouched() {
        let mut store = PlanStore::open(MemoryStorage::new()).unwrap();
        store.add_transaction(installment_tx("a", &[100.0])).unwrap();
        let before = store.state().clone();
        assert!(store.add_transaction(installment_tx("a", &[100.0])).is_err());
        let patch = TransactionPatch {
            installments: Some(installment_tx("x", &[10.0]).schedule.installments().to_vec()),
            ..Default::default()
        };
        assert!(store.update_transaction("a", patch).is_err());
        assert!(store.set_fund("cash", -1.0).is_err());
        assert!(store.delete_transaction("nope").is_err());
        assert_eq!(store.state(), &before);
    }
}
