use rust_decimal::Decimal;

use crate::events::LedgerEvent;
use crate::expenses::Expense;
use crate::goals::Goal;
use crate::portfolio::PortfolioAsset;
use crate::records::RecordKind;

/// A confirmed remote result, or a local budget change, to apply to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    ExpensesLoaded(Vec<Expense>),
    ExpenseCreated(Expense),
    ExpenseUpdated(Expense),
    ExpenseDeleted(String),

    GoalsLoaded(Vec<Goal>),
    GoalCreated(Goal),
    GoalUpdated(Goal),
    GoalDeleted(String),
    /// The goal as returned by the service after it applied the contribution.
    ContributionApplied(Goal),

    AssetsLoaded(Vec<PortfolioAsset>),
    AssetCreated(PortfolioAsset),
    AssetUpdated(PortfolioAsset),
    AssetDeleted(String),
    PricesRefreshed(Vec<PortfolioAsset>),

    MonthlyBudgetSet(Decimal),
    CategoryBudgetSet { category_id: String, amount: Decimal },
    CategoryBudgetCleared(String),
}

/// How a valid mutation affected the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// The referenced record is no longer held locally; nothing changed.
    NotFoundLocally,
    /// An out-of-order confirmation older than the local record; nothing changed.
    Stale,
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyOutcome::Applied)
    }
}

impl Mutation {
    /// Record kind touched by the mutation; `None` for budget changes.
    pub fn kind(&self) -> Option<RecordKind> {
        match self {
            Mutation::ExpensesLoaded(_)
            | Mutation::ExpenseCreated(_)
            | Mutation::ExpenseUpdated(_)
            | Mutation::ExpenseDeleted(_) => Some(RecordKind::Expense),
            Mutation::GoalsLoaded(_)
            | Mutation::GoalCreated(_)
            | Mutation::GoalUpdated(_)
            | Mutation::GoalDeleted(_)
            | Mutation::ContributionApplied(_) => Some(RecordKind::Goal),
            Mutation::AssetsLoaded(_)
            | Mutation::AssetCreated(_)
            | Mutation::AssetUpdated(_)
            | Mutation::AssetDeleted(_)
            | Mutation::PricesRefreshed(_) => Some(RecordKind::PortfolioAsset),
            Mutation::MonthlyBudgetSet(_)
            | Mutation::CategoryBudgetSet { .. }
            | Mutation::CategoryBudgetCleared(_) => None,
        }
    }

    /// Events describing this mutation once applied.
    pub fn events(&self) -> Vec<LedgerEvent> {
        let event = match self {
            Mutation::ExpensesLoaded(records) => LedgerEvent::RecordsReplaced {
                kind: RecordKind::Expense,
                record_count: records.len(),
            },
            Mutation::GoalsLoaded(records) => LedgerEvent::RecordsReplaced {
                kind: RecordKind::Goal,
                record_count: records.len(),
            },
            Mutation::AssetsLoaded(records) => LedgerEvent::RecordsReplaced {
                kind: RecordKind::PortfolioAsset,
                record_count: records.len(),
            },
            Mutation::PricesRefreshed(records) => LedgerEvent::PricesRefreshed {
                asset_count: records.len(),
            },
            Mutation::ExpenseCreated(e) | Mutation::ExpenseUpdated(e) => {
                LedgerEvent::records_changed(RecordKind::Expense, e.id.clone())
            }
            Mutation::GoalCreated(g) | Mutation::GoalUpdated(g) => {
                LedgerEvent::records_changed(RecordKind::Goal, g.id.clone())
            }
            Mutation::AssetCreated(a) | Mutation::AssetUpdated(a) => {
                LedgerEvent::records_changed(RecordKind::PortfolioAsset, a.id.clone())
            }
            Mutation::ContributionApplied(g) => LedgerEvent::ContributionRecorded {
                goal_id: g.id.clone(),
                current_amount: g.current_amount,
            },
            Mutation::ExpenseDeleted(id) => {
                LedgerEvent::records_removed(RecordKind::Expense, id.clone())
            }
            Mutation::GoalDeleted(id) => LedgerEvent::records_removed(RecordKind::Goal, id.clone()),
            Mutation::AssetDeleted(id) => {
                LedgerEvent::records_removed(RecordKind::PortfolioAsset, id.clone())
            }
            Mutation::MonthlyBudgetSet(_) => LedgerEvent::BudgetChanged { category_id: None },
            Mutation::CategoryBudgetSet { category_id, .. }
            | Mutation::CategoryBudgetCleared(category_id) => LedgerEvent::BudgetChanged {
                category_id: Some(category_id.clone()),
            },
        };
        vec![event]
    }
}
