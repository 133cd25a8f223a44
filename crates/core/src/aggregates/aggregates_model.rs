use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::AssetType;

/// Portfolio totals derived from the held assets. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioAggregate {
    /// Σ quantity × current price
    pub total_value: Decimal,
    /// Σ quantity × purchase price
    pub total_cost: Decimal,
    /// total_value − total_cost
    pub total_gain_loss: Decimal,
    /// Gain/loss over cost in percent; zero when the cost is zero.
    pub total_gain_loss_pct: Decimal,
    pub asset_count: usize,
}

/// Valuation of a single held asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPerformance {
    pub asset_id: String,
    pub symbol: String,
    pub asset_type: AssetType,
    pub market_value: Decimal,
    pub cost_basis: Decimal,
    pub gain_loss: Decimal,
    pub gain_loss_pct: Decimal,
}

/// Share of the portfolio value held in one asset type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetTypeAllocation {
    pub asset_type: AssetType,
    pub market_value: Decimal,
    /// Percentage of total portfolio value (0-100)
    pub weight_pct: Decimal,
}

/// Spending in one category against its ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBudgetUsage {
    pub category_id: String,
    pub spent: Decimal,
    pub ceiling: Option<Decimal>,
    /// ceiling − spent; negative once over budget
    pub remaining: Option<Decimal>,
    pub percent_used: Option<Decimal>,
    pub is_over_budget: bool,
    pub expense_count: usize,
}

/// Spending against the monthly budget, broken down by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUsage {
    pub monthly_budget: Option<Decimal>,
    pub total_spent: Decimal,
    pub remaining: Option<Decimal>,
    pub percent_used: Option<Decimal>,
    pub is_over_budget: bool,
    /// Ordered by category id
    pub categories: Vec<CategoryBudgetUsage>,
}

impl BudgetUsage {
    pub fn category(&self, category_id: &str) -> Option<&CategoryBudgetUsage> {
        self.categories.iter().find(|c| c.category_id == category_id)
    }

    pub fn over_budget_categories(&self) -> impl Iterator<Item = &CategoryBudgetUsage> {
        self.categories.iter().filter(|c| c.is_over_budget)
    }
}

/// Display-oriented progress of a savings goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal_id: String,
    /// current / target clamped to [0, 1]
    pub progress_ratio: Decimal,
    pub progress_pct: Decimal,
    pub remaining_amount: Decimal,
    pub is_achieved: bool,
    /// Months of planned contributions needed to close the gap.
    pub months_to_target: Option<u32>,
}
