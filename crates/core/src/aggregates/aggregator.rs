//! Pure recomputation of derived values from record snapshots.
//!
//! Nothing here mutates or caches: every call reads the records it is
//! given and returns fresh values. Sums saturate at the `Decimal` bounds
//! instead of panicking.

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::aggregates_model::{
    AssetPerformance, AssetTypeAllocation, BudgetUsage, CategoryBudgetUsage, GoalProgress,
    PortfolioAggregate,
};
use crate::budget::Budget;
use crate::expenses::Expense;
use crate::goals::Goal;
use crate::portfolio::{AssetType, PortfolioAsset};
use crate::settings::LedgerSettings;

#[derive(Debug, Clone)]
pub struct Aggregator {
    percent_scale: u32,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(&LedgerSettings::default())
    }
}

impl Aggregator {
    pub fn new(settings: &LedgerSettings) -> Self {
        Self {
            percent_scale: settings.percent_scale,
        }
    }

    /// `part / whole × 100`, rounded; zero when `whole` is zero.
    fn percent_of(&self, part: Decimal, whole: Decimal) -> Decimal {
        if whole.is_zero() {
            return Decimal::ZERO;
        }
        part.checked_div(whole)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map(|pct| pct.round_dp(self.percent_scale))
            .unwrap_or(Decimal::ZERO)
    }

    pub fn portfolio_totals(&self, assets: &[PortfolioAsset]) -> PortfolioAggregate {
        let (total_value, total_cost) = assets.iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(value, cost), asset| {
                (
                    value.saturating_add(asset.market_value()),
                    cost.saturating_add(asset.cost_basis()),
                )
            },
        );
        let total_gain_loss = total_value.saturating_sub(total_cost);

        PortfolioAggregate {
            total_value,
            total_cost,
            total_gain_loss,
            total_gain_loss_pct: self.percent_of(total_gain_loss, total_cost),
            asset_count: assets.len(),
        }
    }

    pub fn asset_performance(&self, asset: &PortfolioAsset) -> AssetPerformance {
        let market_value = asset.market_value();
        let cost_basis = asset.cost_basis();
        let gain_loss = market_value.saturating_sub(cost_basis);

        AssetPerformance {
            asset_id: asset.id.clone(),
            symbol: asset.symbol.clone(),
            asset_type: asset.asset_type,
            market_value,
            cost_basis,
            gain_loss,
            gain_loss_pct: self.percent_of(gain_loss, cost_basis),
        }
    }

    /// Market value per asset type, in asset type order.
    pub fn allocation_by_type(&self, assets: &[PortfolioAsset]) -> Vec<AssetTypeAllocation> {
        let mut by_type: BTreeMap<AssetType, Decimal> = BTreeMap::new();
        for asset in assets {
            let value = by_type.entry(asset.asset_type).or_insert(Decimal::ZERO);
            *value = value.saturating_add(asset.market_value());
        }
        let total = by_type
            .values()
            .fold(Decimal::ZERO, |sum, value| sum.saturating_add(*value));

        by_type
            .into_iter()
            .map(|(asset_type, market_value)| AssetTypeAllocation {
                asset_type,
                market_value,
                weight_pct: self.percent_of(market_value, total),
            })
            .collect()
    }

    /// Spending of the given expenses against the budget.
    ///
    /// Categories with spending or a ceiling are listed. Without a ceiling a
    /// category is never over budget.
    pub fn budget_usage<'a, I>(&self, expenses: I, budget: &Budget) -> BudgetUsage
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        let mut spent_by_category: BTreeMap<&str, (Decimal, usize)> = budget
            .category_ceilings
            .keys()
            .map(|id| (id.as_str(), (Decimal::ZERO, 0)))
            .collect();

        let mut total_spent = Decimal::ZERO;
        for expense in expenses {
            total_spent = total_spent.saturating_add(expense.amount);
            let entry = spent_by_category
                .entry(expense.category_id.as_str())
                .or_insert((Decimal::ZERO, 0));
            entry.0 = entry.0.saturating_add(expense.amount);
            entry.1 += 1;
        }

        let categories = spent_by_category
            .into_iter()
            .map(|(category_id, (spent, expense_count))| {
                let ceiling = budget.ceiling_for(category_id);
                CategoryBudgetUsage {
                    category_id: category_id.to_string(),
                    spent,
                    ceiling,
                    remaining: ceiling.map(|c| c.saturating_sub(spent)),
                    percent_used: self.percent_used(spent, ceiling),
                    is_over_budget: ceiling.is_some_and(|c| spent > c),
                    expense_count,
                }
            })
            .collect();

        let monthly_budget = budget.monthly_total;
        BudgetUsage {
            monthly_budget,
            total_spent,
            remaining: monthly_budget.map(|b| b.saturating_sub(total_spent)),
            percent_used: self.percent_used(total_spent, monthly_budget),
            is_over_budget: monthly_budget.is_some_and(|b| total_spent > b),
            categories,
        }
    }

    /// Budget usage restricted to expenses recorded in the month containing `month`.
    pub fn monthly_budget_usage(
        &self,
        expenses: &[Expense],
        budget: &Budget,
        month: NaiveDate,
    ) -> BudgetUsage {
        let in_month = expenses.iter().filter(|expense| {
            let date = expense.recorded_on();
            date.year() == month.year() && date.month() == month.month()
        });
        self.budget_usage(in_month, budget)
    }

    fn percent_used(&self, spent: Decimal, ceiling: Option<Decimal>) -> Option<Decimal> {
        match ceiling {
            Some(c) if !c.is_zero() => Some(self.percent_of(spent, c)),
            _ => None,
        }
    }

    pub fn goal_progress(&self, goal: &Goal) -> GoalProgress {
        let target = goal.target_amount;
        let current = goal.current_amount;

        // A goal with nothing to save is complete.
        let progress_ratio = if target <= Decimal::ZERO {
            Decimal::ONE
        } else {
            current
                .checked_div(target)
                .unwrap_or(Decimal::ZERO)
                .clamp(Decimal::ZERO, Decimal::ONE)
        };
        let remaining_amount = target.saturating_sub(current).max(Decimal::ZERO);

        let months_to_target = if remaining_amount.is_zero() {
            Some(0)
        } else if goal.monthly_contribution > Decimal::ZERO {
            remaining_amount
                .checked_div(goal.monthly_contribution)
                .and_then(|months| months.ceil().to_u32())
        } else {
            None
        };

        GoalProgress {
            goal_id: goal.id.clone(),
            progress_ratio,
            progress_pct: (progress_ratio * Decimal::ONE_HUNDRED).round_dp(self.percent_scale),
            remaining_amount,
            is_achieved: current >= target,
            months_to_target,
        }
    }

    pub fn goals_progress(&self, goals: &[Goal]) -> Vec<GoalProgress> {
        goals.iter().map(|goal| self.goal_progress(goal)).collect()
    }
}
