use crate::errors::Result;
use crate::goals::goals_model::{Goal, GoalUpdate, NewGoal};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Record service for savings goals
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    async fn list(&self) -> Result<Vec<Goal>>;
    async fn create(&self, new_goal: NewGoal) -> Result<Goal>;
    async fn update(&self, goal_id: &str, changes: GoalUpdate) -> Result<Goal>;
    async fn delete(&self, goal_id: &str) -> Result<()>;
    /// Applies a contribution server-side and returns the goal with its advanced current amount.
    async fn add_contribution(&self, goal_id: &str, amount: Decimal) -> Result<Goal>;
}
