use serde::{Deserialize, Serialize};
use std::fmt;

use crate::expenses::Expense;
use crate::goals::Goal;
use crate::portfolio::PortfolioAsset;
use crate::records::{RecordCollection, RecordStore};

/// The record collections held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Expense,
    Goal,
    PortfolioAsset,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [
        RecordKind::Expense,
        RecordKind::Goal,
        RecordKind::PortfolioAsset,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Expense => "expense",
            RecordKind::Goal => "goal",
            RecordKind::PortfolioAsset => "portfolio_asset",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a record absent from its collection is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Head,
    Tail,
}

/// Result of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}

/// A record kept in the [`RecordStore`], keyed by a unique identity.
pub trait LedgerRecord: Clone + fmt::Debug + Send + Sync + 'static {
    const KIND: RecordKind;
    const INSERT_POSITION: InsertPosition;

    fn id(&self) -> &str;

    fn collection(store: &RecordStore) -> &RecordCollection<Self>;

    fn collection_mut(store: &mut RecordStore) -> &mut RecordCollection<Self>;
}

// Newest expenses first; goals and assets in creation order.
impl LedgerRecord for Expense {
    const KIND: RecordKind = RecordKind::Expense;
    const INSERT_POSITION: InsertPosition = InsertPosition::Head;

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(store: &RecordStore) -> &RecordCollection<Self> {
        &store.expenses
    }

    fn collection_mut(store: &mut RecordStore) -> &mut RecordCollection<Self> {
        &mut store.expenses
    }
}

impl LedgerRecord for Goal {
    const KIND: RecordKind = RecordKind::Goal;
    const INSERT_POSITION: InsertPosition = InsertPosition::Tail;

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(store: &RecordStore) -> &RecordCollection<Self> {
        &store.goals
    }

    fn collection_mut(store: &mut RecordStore) -> &mut RecordCollection<Self> {
        &mut store.goals
    }
}

impl LedgerRecord for PortfolioAsset {
    const KIND: RecordKind = RecordKind::PortfolioAsset;
    const INSERT_POSITION: InsertPosition = InsertPosition::Tail;

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(store: &RecordStore) -> &RecordCollection<Self> {
        &store.assets
    }

    fn collection_mut(store: &mut RecordStore) -> &mut RecordCollection<Self> {
        &mut store.assets
    }
}
