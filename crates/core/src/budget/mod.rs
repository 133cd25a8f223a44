//! Budget settings kept alongside the expense records.

mod budget_model;

pub use budget_model::Budget;
