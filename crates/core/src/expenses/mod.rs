//! Expenses module - domain models and the record service trait.

mod expenses_model;
mod expenses_traits;

pub use expenses_model::{Expense, ExpenseFilters, ExpenseUpdate, Location, NewExpense};
pub use expenses_traits::ExpenseServiceTrait;
