//! Goals module - domain models and the record service trait.

mod goals_model;
mod goals_traits;

pub use goals_model::{Goal, GoalUpdate, NewGoal};
pub use goals_traits::GoalServiceTrait;
