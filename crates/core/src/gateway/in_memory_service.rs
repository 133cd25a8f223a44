use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::errors::{RemoteError, Result};
use crate::expenses::{Expense, ExpenseFilters, ExpenseServiceTrait, ExpenseUpdate, NewExpense};
use crate::goals::{Goal, GoalServiceTrait, GoalUpdate, NewGoal};
use crate::portfolio::{
    NewPortfolioAsset, PortfolioAsset, PortfolioAssetUpdate, PortfolioServiceTrait,
};

#[derive(Debug, Default)]
struct ServerRecords {
    /// Newest first, as the remote store lists them.
    expenses: Vec<Expense>,
    goals: Vec<Goal>,
    assets: Vec<PortfolioAsset>,
    market_prices: HashMap<String, Decimal>,
    offline: bool,
}

/// Record service that keeps everything in process memory.
///
/// Stands in for the remote store in tests and offline sessions. It assigns
/// identities and timestamps, applies contributions and reprices assets from
/// a settable price table. Clones share the same records.
#[derive(Clone, Default)]
pub struct InMemoryRecordService {
    records: Arc<Mutex<ServerRecords>>,
}

impl InMemoryRecordService {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline every call fails with [`RemoteError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        if let Ok(mut records) = self.records.lock() {
            records.offline = offline;
        }
    }

    /// Sets the price used for `symbol` on creation and on the next refresh.
    pub fn set_market_price(&self, symbol: &str, price: Decimal) {
        if let Ok(mut records) = self.records.lock() {
            records.market_prices.insert(symbol.to_string(), price);
        }
    }

    /// Stores records as if another client had created them.
    pub fn seed_expenses(&self, expenses: Vec<Expense>) {
        if let Ok(mut records) = self.records.lock() {
            records.expenses.extend(expenses);
        }
    }

    pub fn seed_goals(&self, goals: Vec<Goal>) {
        if let Ok(mut records) = self.records.lock() {
            records.goals.extend(goals);
        }
    }

    pub fn seed_assets(&self, assets: Vec<PortfolioAsset>) {
        if let Ok(mut records) = self.records.lock() {
            records.assets.extend(assets);
        }
    }

    fn with_records<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut ServerRecords) -> Result<T>,
    {
        let mut records = self
            .records
            .lock()
            .map_err(|e| RemoteError::Unavailable(e.to_string()))?;
        if records.offline {
            return Err(RemoteError::Unavailable("record service is offline".to_string()).into());
        }
        op(&mut records)
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn find_mut<'a, R, F>(records: &'a mut [R], id: &str, id_of: F) -> Result<&'a mut R>
where
    F: Fn(&R) -> &str,
{
    records
        .iter_mut()
        .find(|r| id_of(r) == id)
        .ok_or_else(|| RemoteError::NotFound(id.to_string()).into())
}

fn remove_by_id<R, F>(records: &mut Vec<R>, id: &str, id_of: F) -> Result<()>
where
    F: Fn(&R) -> &str,
{
    let before = records.len();
    records.retain(|r| id_of(r) != id);
    if records.len() == before {
        return Err(RemoteError::NotFound(id.to_string()).into());
    }
    Ok(())
}

#[async_trait]
impl ExpenseServiceTrait for InMemoryRecordService {
    async fn list(&self, filters: &ExpenseFilters) -> Result<Vec<Expense>> {
        self.with_records(|records| {
            Ok(records
                .expenses
                .iter()
                .filter(|e| filters.matches(e))
                .cloned()
                .collect())
        })
    }

    async fn create(&self, new_expense: NewExpense) -> Result<Expense> {
        self.with_records(|records| {
            let now = Utc::now();
            let expense = Expense {
                id: new_id(),
                amount: new_expense.amount,
                category_id: new_expense.category_id,
                description: new_expense.description,
                store_name: new_expense.store_name,
                receipt_image_url: new_expense.receipt_image_url,
                location: new_expense.location,
                created_at: now,
                updated_at: now,
            };
            records.expenses.insert(0, expense.clone());
            Ok(expense)
        })
    }

    async fn update(&self, expense_id: &str, changes: ExpenseUpdate) -> Result<Expense> {
        self.with_records(|records| {
            let expense = find_mut(&mut records.expenses, expense_id, |e| e.id.as_str())?;
            changes.apply_to(expense);
            expense.updated_at = Utc::now();
            Ok(expense.clone())
        })
    }

    async fn delete(&self, expense_id: &str) -> Result<()> {
        self.with_records(|records| {
            remove_by_id(&mut records.expenses, expense_id, |e| e.id.as_str())
        })
    }
}

#[async_trait]
impl GoalServiceTrait for InMemoryRecordService {
    async fn list(&self) -> Result<Vec<Goal>> {
        self.with_records(|records| Ok(records.goals.clone()))
    }

    async fn create(&self, new_goal: NewGoal) -> Result<Goal> {
        self.with_records(|records| {
            let now = Utc::now();
            let goal = Goal {
                id: new_id(),
                user_id: new_goal.user_id,
                family_id: new_goal.family_id,
                goal_name: new_goal.goal_name,
                target_amount: new_goal.target_amount,
                current_amount: Decimal::ZERO,
                deadline: new_goal.deadline,
                monthly_contribution: new_goal.monthly_contribution,
                created_at: now,
                updated_at: now,
            };
            records.goals.push(goal.clone());
            Ok(goal)
        })
    }

    async fn update(&self, goal_id: &str, changes: GoalUpdate) -> Result<Goal> {
        self.with_records(|records| {
            let goal = find_mut(&mut records.goals, goal_id, |g| g.id.as_str())?;
            changes.apply_to(goal);
            goal.updated_at = Utc::now();
            Ok(goal.clone())
        })
    }

    async fn delete(&self, goal_id: &str) -> Result<()> {
        self.with_records(|records| remove_by_id(&mut records.goals, goal_id, |g| g.id.as_str()))
    }

    async fn add_contribution(&self, goal_id: &str, amount: Decimal) -> Result<Goal> {
        self.with_records(|records| {
            if amount <= Decimal::ZERO {
                return Err(RemoteError::RequestFailed(format!(
                    "Contribution must be positive, got {}",
                    amount
                ))
                .into());
            }
            let goal = find_mut(&mut records.goals, goal_id, |g| g.id.as_str())?;
            goal.current_amount = goal.current_amount.checked_add(amount).ok_or_else(|| {
                RemoteError::RequestFailed(format!(
                    "Contribution of {} would exceed the representable amount",
                    amount
                ))
            })?;
            goal.updated_at = Utc::now();
            debug!("Goal '{}' advanced to {}", goal.id, goal.current_amount);
            Ok(goal.clone())
        })
    }
}

#[async_trait]
impl PortfolioServiceTrait for InMemoryRecordService {
    async fn list(&self) -> Result<Vec<PortfolioAsset>> {
        self.with_records(|records| Ok(records.assets.clone()))
    }

    async fn create(&self, new_asset: NewPortfolioAsset) -> Result<PortfolioAsset> {
        self.with_records(|records| {
            let now = Utc::now();
            let current_price = records
                .market_prices
                .get(&new_asset.symbol)
                .copied()
                .unwrap_or(new_asset.purchase_price);
            let asset = PortfolioAsset {
                id: new_id(),
                symbol: new_asset.symbol,
                asset_type: new_asset.asset_type,
                quantity: new_asset.quantity,
                purchase_price: new_asset.purchase_price,
                purchase_date: new_asset.purchase_date,
                current_price,
                created_at: now,
                updated_at: now,
            };
            records.assets.push(asset.clone());
            Ok(asset)
        })
    }

    async fn update(
        &self,
        asset_id: &str,
        changes: PortfolioAssetUpdate,
    ) -> Result<PortfolioAsset> {
        self.with_records(|records| {
            let asset = find_mut(&mut records.assets, asset_id, |a| a.id.as_str())?;
            changes.apply_to(asset);
            asset.updated_at = Utc::now();
            Ok(asset.clone())
        })
    }

    async fn delete(&self, asset_id: &str) -> Result<()> {
        self.with_records(|records| {
            remove_by_id(&mut records.assets, asset_id, |a| a.id.as_str())
        })
    }

    async fn refresh_prices(&self) -> Result<Vec<PortfolioAsset>> {
        self.with_records(|records| {
            let now = Utc::now();
            let ServerRecords {
                assets,
                market_prices,
                ..
            } = records;
            for asset in assets.iter_mut() {
                if let Some(price) = market_prices.get(&asset.symbol) {
                    asset.current_price = *price;
                    asset.updated_at = now;
                }
            }
            Ok(assets.clone())
        })
    }
}
