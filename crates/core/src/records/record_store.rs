use log::debug;
use serde::Serialize;

use super::record_collection::RecordCollection;
use super::records_model::{LedgerRecord, RecordKind, UpsertOutcome};
use crate::budget::Budget;
use crate::expenses::Expense;
use crate::goals::Goal;
use crate::portfolio::PortfolioAsset;

/// Authoritative in-memory records for the active session.
///
/// Every operation leaves the store in a state the aggregator can read.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStore {
    pub(super) expenses: RecordCollection<Expense>,
    pub(super) goals: RecordCollection<Goal>,
    pub(super) assets: RecordCollection<PortfolioAsset>,
    budget: Budget,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection<R: LedgerRecord>(&self) -> &RecordCollection<R> {
        R::collection(self)
    }

    pub fn records<R: LedgerRecord>(&self) -> &[R] {
        R::collection(self).as_slice()
    }

    pub fn get<R: LedgerRecord>(&self, id: &str) -> Option<&R> {
        R::collection(self).get(id)
    }

    pub fn len(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::Expense => self.expenses.len(),
            RecordKind::Goal => self.goals.len(),
            RecordKind::PortfolioAsset => self.assets.len(),
        }
    }

    pub fn expenses(&self) -> &[Expense] {
        self.expenses.as_slice()
    }

    pub fn goals(&self) -> &[Goal] {
        self.goals.as_slice()
    }

    pub fn assets(&self) -> &[PortfolioAsset] {
        self.assets.as_slice()
    }

    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    pub fn budget_mut(&mut self) -> &mut Budget {
        &mut self.budget
    }

    /// Full replace from a fetch, keeping the server's order.
    pub fn replace_all<R: LedgerRecord>(&mut self, records: Vec<R>) {
        R::collection_mut(self).replace_all(records);
    }

    pub fn upsert<R: LedgerRecord>(&mut self, record: R) -> UpsertOutcome {
        R::collection_mut(self).upsert(record)
    }

    pub fn replace_existing<R: LedgerRecord>(&mut self, record: R) -> bool {
        R::collection_mut(self).replace_existing(record)
    }

    /// Removing an absent identity is a no-op and returns false.
    pub fn remove<R: LedgerRecord>(&mut self, id: &str) -> bool {
        let removed = R::collection_mut(self).remove(id).is_some();
        if !removed {
            debug!("{} '{}' not present locally; nothing to remove", R::KIND, id);
        }
        removed
    }

    /// Drops every record and the budget settings.
    pub fn clear(&mut self) {
        self.expenses.clear();
        self.goals.clear();
        self.assets.clear();
        self.budget = Budget::default();
    }
}
