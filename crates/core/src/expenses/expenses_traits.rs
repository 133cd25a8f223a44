use crate::errors::Result;
use crate::expenses::expenses_model::{Expense, ExpenseFilters, ExpenseUpdate, NewExpense};
use async_trait::async_trait;

/// Record service for expenses. Every call returns the server's confirmed result.
#[async_trait]
pub trait ExpenseServiceTrait: Send + Sync {
    async fn list(&self, filters: &ExpenseFilters) -> Result<Vec<Expense>>;
    async fn create(&self, new_expense: NewExpense) -> Result<Expense>;
    async fn update(&self, expense_id: &str, changes: ExpenseUpdate) -> Result<Expense>;
    async fn delete(&self, expense_id: &str) -> Result<()>;
}
