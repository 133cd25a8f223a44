/// Currency used when none is configured
pub const DEFAULT_CURRENCY: &str = "USD";

/// Decimal places allowed on money amounts (expenses, goals, budgets)
pub const DEFAULT_CURRENCY_SCALE: u32 = 2;

/// Decimal places kept on derived percentages
pub const DEFAULT_PERCENT_SCALE: u32 = 2;

/// Environment variables read by `LedgerSettings::from_env`
pub const ENV_CURRENCY: &str = "FW_CURRENCY";
pub const ENV_CURRENCY_SCALE: &str = "FW_CURRENCY_SCALE";
pub const ENV_PERCENT_SCALE: &str = "FW_PERCENT_SCALE";

/// Largest scale rust_decimal can represent
pub const MAX_DECIMAL_SCALE: u32 = 28;

// Messages stored on a slice when the service gives no detail
pub const FETCH_EXPENSES_FAILED: &str = "Failed to fetch expenses";
pub const SAVE_EXPENSE_FAILED: &str = "Failed to save expense";
pub const DELETE_EXPENSE_FAILED: &str = "Failed to delete expense";
pub const FETCH_GOALS_FAILED: &str = "Failed to fetch goals";
pub const SAVE_GOAL_FAILED: &str = "Failed to save goal";
pub const DELETE_GOAL_FAILED: &str = "Failed to delete goal";
pub const CONTRIBUTION_FAILED: &str = "Failed to add contribution";
pub const FETCH_PORTFOLIO_FAILED: &str = "Failed to fetch portfolio";
pub const SAVE_ASSET_FAILED: &str = "Failed to save asset";
pub const DELETE_ASSET_FAILED: &str = "Failed to delete asset";
pub const REFRESH_PRICES_FAILED: &str = "Failed to update prices";
