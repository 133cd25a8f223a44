//! Field checks applied to inputs before a remote call and to confirmed
//! records before they reach the store.

use rust_decimal::Decimal;

use crate::errors::{Result, ValidationError};
use crate::expenses::{Expense, ExpenseUpdate, Location, NewExpense};
use crate::goals::{Goal, GoalUpdate, NewGoal};
use crate::portfolio::{NewPortfolioAsset, PortfolioAsset, PortfolioAssetUpdate};
use crate::settings::LedgerSettings;

#[derive(Debug, Clone)]
pub struct RecordValidator {
    currency_scale: u32,
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self::new(&LedgerSettings::default())
    }
}

impl RecordValidator {
    pub fn new(settings: &LedgerSettings) -> Self {
        Self {
            currency_scale: settings.currency_scale,
        }
    }

    // --- Expenses ---

    pub fn validate_expense(&self, expense: &Expense) -> Result<()> {
        require_id("id", &expense.id)?;
        self.check_money("amount", expense.amount)?;
        require_text("categoryId", &expense.category_id)?;
        check_location(expense.location.as_ref())
    }

    pub fn validate_new_expense(&self, new_expense: &NewExpense) -> Result<()> {
        self.check_money("amount", new_expense.amount)?;
        require_text("categoryId", &new_expense.category_id)?;
        check_location(new_expense.location.as_ref())
    }

    pub fn validate_expense_update(&self, expense_id: &str, changes: &ExpenseUpdate) -> Result<()> {
        require_id("id", expense_id)?;
        if let Some(amount) = changes.amount {
            self.check_money("amount", amount)?;
        }
        if let Some(category_id) = &changes.category_id {
            require_text("categoryId", category_id)?;
        }
        check_location(changes.location.flatten().as_ref())
    }

    // --- Goals ---

    pub fn validate_goal(&self, goal: &Goal) -> Result<()> {
        require_id("id", &goal.id)?;
        require_text("goalName", &goal.goal_name)?;
        self.check_money("targetAmount", goal.target_amount)?;
        self.check_money("currentAmount", goal.current_amount)?;
        self.check_money("monthlyContribution", goal.monthly_contribution)
    }

    pub fn validate_new_goal(&self, new_goal: &NewGoal) -> Result<()> {
        require_text("goalName", &new_goal.goal_name)?;
        self.check_money("targetAmount", new_goal.target_amount)?;
        self.check_money("monthlyContribution", new_goal.monthly_contribution)
    }

    pub fn validate_goal_update(&self, goal_id: &str, changes: &GoalUpdate) -> Result<()> {
        require_id("id", goal_id)?;
        if let Some(name) = &changes.goal_name {
            require_text("goalName", name)?;
        }
        if let Some(target) = changes.target_amount {
            self.check_money("targetAmount", target)?;
        }
        if let Some(monthly) = changes.monthly_contribution {
            self.check_money("monthlyContribution", monthly)?;
        }
        Ok(())
    }

    pub fn validate_contribution(&self, goal_id: &str, amount: Decimal) -> Result<()> {
        require_id("goalId", goal_id)?;
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount {
                field: "amount".to_string(),
                value: amount,
            }
            .into());
        }
        self.check_precision("amount", amount)
    }

    // --- Portfolio ---

    pub fn validate_asset(&self, asset: &PortfolioAsset) -> Result<()> {
        require_id("id", &asset.id)?;
        require_text("symbol", &asset.symbol)?;
        non_negative("quantity", asset.quantity)?;
        non_negative("purchasePrice", asset.purchase_price)?;
        non_negative("currentPrice", asset.current_price)?;
        representable_product("marketValue", asset.quantity, asset.current_price)?;
        representable_product("costBasis", asset.quantity, asset.purchase_price)
    }

    pub fn validate_new_asset(&self, new_asset: &NewPortfolioAsset) -> Result<()> {
        require_text("symbol", &new_asset.symbol)?;
        non_negative("quantity", new_asset.quantity)?;
        non_negative("purchasePrice", new_asset.purchase_price)?;
        representable_product("costBasis", new_asset.quantity, new_asset.purchase_price)
    }

    pub fn validate_asset_update(
        &self,
        asset_id: &str,
        changes: &PortfolioAssetUpdate,
    ) -> Result<()> {
        require_id("id", asset_id)?;
        if let Some(symbol) = &changes.symbol {
            require_text("symbol", symbol)?;
        }
        if let Some(quantity) = changes.quantity {
            non_negative("quantity", quantity)?;
        }
        if let Some(price) = changes.purchase_price {
            non_negative("purchasePrice", price)?;
        }
        if let (Some(quantity), Some(price)) = (changes.quantity, changes.purchase_price) {
            representable_product("costBasis", quantity, price)?;
        }
        Ok(())
    }

    // --- Budget ---

    pub fn validate_budget_amount(&self, amount: Decimal) -> Result<()> {
        self.check_money("amount", amount)
    }

    pub fn validate_category_id(&self, category_id: &str) -> Result<()> {
        require_text("categoryId", category_id)
    }

    /// Identity carried by a delete confirmation.
    pub fn validate_identity(&self, id: &str) -> Result<()> {
        require_id("id", id)
    }

    fn check_money(&self, field: &str, value: Decimal) -> Result<()> {
        non_negative(field, value)?;
        self.check_precision(field, value)
    }

    fn check_precision(&self, field: &str, value: Decimal) -> Result<()> {
        // Trailing zeros (12.500) do not count against the scale.
        if value.normalize().scale() > self.currency_scale {
            return Err(ValidationError::ExcessPrecision {
                field: field.to_string(),
                value,
                scale: self.currency_scale,
            }
            .into());
        }
        Ok(())
    }
}

fn require_id(field: &str, id: &str) -> Result<()> {
    require_text(field, id)
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field.to_string()).into());
    }
    Ok(())
}

fn non_negative(field: &str, value: Decimal) -> Result<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::NegativeAmount {
            field: field.to_string(),
            value,
        }
        .into());
    }
    Ok(())
}

/// Valuations multiply quantity by price; both factors may be valid while
/// the product is not representable.
fn representable_product(field: &str, quantity: Decimal, price: Decimal) -> Result<()> {
    if quantity.checked_mul(price).is_none() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            detail: format!("{} x {} exceeds the representable amount", quantity, price),
        }
        .into());
    }
    Ok(())
}

fn check_location(location: Option<&Location>) -> Result<()> {
    let Some(location) = location else {
        return Ok(());
    };
    if !location.latitude.is_finite() || !(-90.0..=90.0).contains(&location.latitude) {
        return Err(ValidationError::InvalidInput(format!(
            "latitude {} is outside [-90, 90]",
            location.latitude
        ))
        .into());
    }
    if !location.longitude.is_finite() || !(-180.0..=180.0).contains(&location.longitude) {
        return Err(ValidationError::InvalidInput(format!(
            "longitude {} is outside [-180, 180]",
            location.longitude
        ))
        .into());
    }
    if let Some(accuracy) = location.accuracy {
        if !accuracy.is_finite() || accuracy < 0.0 {
            return Err(ValidationError::InvalidInput(format!(
                "location accuracy {} must be a non-negative distance",
                accuracy
            ))
            .into());
        }
    }
    Ok(())
}
