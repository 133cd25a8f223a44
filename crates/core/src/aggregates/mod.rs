//! Aggregates - budget usage, goal progress and portfolio valuation.

mod aggregates_model;
mod aggregator;


pub use aggregates_model::{
    AssetPerformance, AssetTypeAllocation, BudgetUsage, CategoryBudgetUsage, GoalProgress,
    PortfolioAggregate,
};
pub use aggregator::Aggregator;
