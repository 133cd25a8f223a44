//! Ledger event types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::records::RecordKind;

/// Facts about ledger changes, emitted after a mutation has been applied.
///
/// Presentation layers use them to re-read the aggregates they display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A collection was replaced by a full load.
    RecordsReplaced { kind: RecordKind, record_count: usize },

    /// Records were inserted or replaced in place.
    RecordsChanged {
        kind: RecordKind,
        record_ids: Vec<String>,
    },

    /// Records were removed.
    RecordsRemoved {
        kind: RecordKind,
        record_ids: Vec<String>,
    },

    /// The monthly total or a category ceiling changed.
    /// `category_id` is `None` for the monthly total.
    BudgetChanged { category_id: Option<String> },

    /// A confirmed contribution advanced a goal.
    ContributionRecorded {
        goal_id: String,
        current_amount: Decimal,
    },

    /// Asset prices were refreshed from the market.
    PricesRefreshed { asset_count: usize },
}

impl LedgerEvent {
    pub fn records_changed(kind: RecordKind, record_id: impl Into<String>) -> Self {
        Self::RecordsChanged {
            kind,
            record_ids: vec![record_id.into()],
        }
    }

    pub fn records_removed(kind: RecordKind, record_id: impl Into<String>) -> Self {
        Self::RecordsRemoved {
            kind,
            record_ids: vec![record_id.into()],
        }
    }

    /// The record kind this event concerns, if any.
    pub fn kind(&self) -> Option<RecordKind> {
        match self {
            Self::RecordsReplaced { kind, .. }
            | Self::RecordsChanged { kind, .. }
            | Self::RecordsRemoved { kind, .. } => Some(*kind),
            Self::ContributionRecorded { .. } => Some(RecordKind::Goal),
            Self::PricesRefreshed { .. } => Some(RecordKind::PortfolioAsset),
            Self::BudgetChanged { .. } => None,
        }
    }
}
