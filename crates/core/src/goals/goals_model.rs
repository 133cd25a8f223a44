//! Goals domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Domain model representing a savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub family_id: String,
    pub goal_name: String,
    pub target_amount: Decimal,
    /// Advanced by the service on each contribution, never edited directly.
    pub current_amount: Decimal,
    pub deadline: NaiveDate,
    /// Planned monthly contribution.
    pub monthly_contribution: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input model for creating a new goal. The service starts the current amount at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub user_id: String,
    pub family_id: String,
    pub goal_name: String,
    pub target_amount: Decimal,
    pub deadline: NaiveDate,
    pub monthly_contribution: Decimal,
}

/// Partial update of a goal.
///
/// There is no current amount here: it only moves through contributions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    pub goal_name: Option<String>,
    pub target_amount: Option<Decimal>,
    pub deadline: Option<NaiveDate>,
    pub monthly_contribution: Option<Decimal>,
}

impl GoalUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, goal: &mut Goal) {
        if let Some(name) = &self.goal_name {
            goal.goal_name = name.clone();
        }
        if let Some(target) = self.target_amount {
            goal.target_amount = target;
        }
        if let Some(deadline) = self.deadline {
            goal.deadline = deadline;
        }
        if let Some(monthly) = self.monthly_contribution {
            goal.monthly_contribution = monthly;
        }
    }
}
