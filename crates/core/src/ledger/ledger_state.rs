use serde::{Deserialize, Serialize};

use super::mutation::{ApplyOutcome, Mutation};
use super::mutation_applier::MutationApplier;
use crate::aggregates::{Aggregator, PortfolioAggregate};
use crate::budget::Budget;
use crate::errors::{Error, Result};
use crate::expenses::Expense;
use crate::goals::Goal;
use crate::portfolio::PortfolioAsset;
use crate::records::{RecordKind, RecordStore};

/// Request status of one record kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceStatus {
    /// Fetches started but not yet finished.
    pub in_flight: u32,
    /// Message of the most recent failure, until cleared or a fetch succeeds.
    pub error: Option<String>,
}

impl SliceStatus {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub(crate) fn begin_fetch(&mut self) {
        self.in_flight += 1;
        self.error = None;
    }

    pub(crate) fn end_fetch(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Stores the error's message, or `fallback` when it has none.
    pub(crate) fn record_failure(&mut self, error: &Error, fallback: &str) {
        let message = error.to_string();
        self.error = Some(if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        });
    }
}

/// Session state: the record store plus request status and the cached
/// portfolio totals.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    store: RecordStore,
    expense_status: SliceStatus,
    goal_status: SliceStatus,
    asset_status: SliceStatus,
    portfolio_totals: PortfolioAggregate,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn status(&self, kind: RecordKind) -> &SliceStatus {
        match kind {
            RecordKind::Expense => &self.expense_status,
            RecordKind::Goal => &self.goal_status,
            RecordKind::PortfolioAsset => &self.asset_status,
        }
    }

    pub(crate) fn status_mut(&mut self, kind: RecordKind) -> &mut SliceStatus {
        match kind {
            RecordKind::Expense => &mut self.expense_status,
            RecordKind::Goal => &mut self.goal_status,
            RecordKind::PortfolioAsset => &mut self.asset_status,
        }
    }

    /// Totals as of the last asset change.
    pub fn portfolio_totals(&self) -> &PortfolioAggregate {
        &self.portfolio_totals
    }

    /// Applies a mutation and, when it changed the assets, recomputes the
    /// portfolio totals before returning.
    pub fn apply(
        &mut self,
        applier: &MutationApplier,
        aggregator: &Aggregator,
        mutation: Mutation,
    ) -> Result<ApplyOutcome> {
        let touches_assets = mutation.kind() == Some(RecordKind::PortfolioAsset);
        let outcome = applier.apply(&mut self.store, mutation)?;
        if touches_assets && outcome.is_applied() {
            self.portfolio_totals = aggregator.portfolio_totals(self.store.assets());
        }
        Ok(outcome)
    }

    /// Drops all records, budget settings and statuses.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            expenses: self.store.expenses().to_vec(),
            goals: self.store.goals().to_vec(),
            assets: self.store.assets().to_vec(),
            budget: self.store.budget().clone(),
            portfolio_totals: self.portfolio_totals.clone(),
            expense_status: self.expense_status.clone(),
            goal_status: self.goal_status.clone(),
            asset_status: self.asset_status.clone(),
        }
    }
}

/// Owned copy of the ledger for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    pub expenses: Vec<Expense>,
    pub goals: Vec<Goal>,
    pub assets: Vec<PortfolioAsset>,
    pub budget: Budget,
    pub portfolio_totals: PortfolioAggregate,
    pub expense_status: SliceStatus,
    pub goal_status: SliceStatus,
    pub asset_status: SliceStatus,
}
