use log::{debug, info};

use super::mutation::{ApplyOutcome, Mutation};
use super::validation::RecordValidator;
use crate::errors::Result;
use crate::expenses::Expense;
use crate::goals::Goal;
use crate::portfolio::PortfolioAsset;
use crate::records::{LedgerRecord, RecordStore};
use crate::settings::LedgerSettings;

/// Single entry point for changing the [`RecordStore`].
///
/// A mutation is validated in full before the store is touched, so a
/// rejected mutation never leaves a partial change behind. Updates and
/// deletes for records that are no longer held locally succeed without
/// effect: confirmations may arrive in a different order than the calls
/// were issued.
#[derive(Debug, Clone, Default)]
pub struct MutationApplier {
    validator: RecordValidator,
}

impl MutationApplier {
    pub fn new(settings: &LedgerSettings) -> Self {
        Self {
            validator: RecordValidator::new(settings),
        }
    }

    pub fn validator(&self) -> &RecordValidator {
        &self.validator
    }

    pub fn apply(&self, store: &mut RecordStore, mutation: Mutation) -> Result<ApplyOutcome> {
        let v = &self.validator;
        match mutation {
            Mutation::ExpensesLoaded(expenses) => {
                validate_all(&expenses, |e| v.validate_expense(e))?;
                replace_all(store, expenses)
            }
            Mutation::ExpenseCreated(expense) => {
                v.validate_expense(&expense)?;
                store.upsert(expense);
                Ok(ApplyOutcome::Applied)
            }
            Mutation::ExpenseUpdated(expense) => {
                v.validate_expense(&expense)?;
                Ok(replace_if_present(store, expense))
            }
            Mutation::ExpenseDeleted(id) => {
                v.validate_identity(&id)?;
                Ok(remove::<Expense>(store, &id))
            }

            Mutation::GoalsLoaded(goals) => {
                validate_all(&goals, |g| v.validate_goal(g))?;
                replace_all(store, goals)
            }
            Mutation::GoalCreated(goal) => {
                v.validate_goal(&goal)?;
                store.upsert(goal);
                Ok(ApplyOutcome::Applied)
            }
            Mutation::GoalUpdated(mut goal) => {
                v.validate_goal(&goal)?;
                let Some(local_amount) = store.get::<Goal>(&goal.id).map(|g| g.current_amount)
                else {
                    return Ok(not_found::<Goal>(&goal.id));
                };
                if goal.current_amount != local_amount {
                    debug!(
                        "Goal '{}' update carried current amount {}; keeping local {}",
                        goal.id, goal.current_amount, local_amount
                    );
                    goal.current_amount = local_amount;
                }
                store.replace_existing(goal);
                Ok(ApplyOutcome::Applied)
            }
            Mutation::GoalDeleted(id) => {
                v.validate_identity(&id)?;
                Ok(remove::<Goal>(store, &id))
            }
            Mutation::ContributionApplied(goal) => {
                v.validate_goal(&goal)?;
                let Some(local_amount) = store.get::<Goal>(&goal.id).map(|g| g.current_amount)
                else {
                    return Ok(not_found::<Goal>(&goal.id));
                };
                // The service already advanced the amount; take its value as-is.
                if goal.current_amount < local_amount {
                    debug!(
                        "Ignoring stale contribution result for goal '{}': {} < local {}",
                        goal.id, goal.current_amount, local_amount
                    );
                    return Ok(ApplyOutcome::Stale);
                }
                store.replace_existing(goal);
                Ok(ApplyOutcome::Applied)
            }

            Mutation::AssetsLoaded(assets) | Mutation::PricesRefreshed(assets) => {
                validate_all(&assets, |a| v.validate_asset(a))?;
                replace_all(store, assets)
            }
            Mutation::AssetCreated(asset) => {
                v.validate_asset(&asset)?;
                store.upsert(asset);
                Ok(ApplyOutcome::Applied)
            }
            Mutation::AssetUpdated(mut asset) => {
                v.validate_asset(&asset)?;
                let Some(local_price) = store
                    .get::<PortfolioAsset>(&asset.id)
                    .map(|a| a.current_price)
                else {
                    return Ok(not_found::<PortfolioAsset>(&asset.id));
                };
                // Holding edits never reprice; only a refresh or a load does.
                asset.current_price = local_price;
                store.replace_existing(asset);
                Ok(ApplyOutcome::Applied)
            }
            Mutation::AssetDeleted(id) => {
                v.validate_identity(&id)?;
                Ok(remove::<PortfolioAsset>(store, &id))
            }

            Mutation::MonthlyBudgetSet(amount) => {
                v.validate_budget_amount(amount)?;
                store.budget_mut().set_monthly_total(amount);
                Ok(ApplyOutcome::Applied)
            }
            Mutation::CategoryBudgetSet {
                category_id,
                amount,
            } => {
                v.validate_category_id(&category_id)?;
                v.validate_budget_amount(amount)?;
                store.budget_mut().set_ceiling(category_id, amount);
                Ok(ApplyOutcome::Applied)
            }
            Mutation::CategoryBudgetCleared(category_id) => {
                v.validate_category_id(&category_id)?;
                match store.budget_mut().clear_ceiling(&category_id) {
                    Some(_) => Ok(ApplyOutcome::Applied),
                    None => {
                        debug!("No budget ceiling for category '{}' to clear", category_id);
                        Ok(ApplyOutcome::NotFoundLocally)
                    }
                }
            }
        }
    }
}

fn validate_all<R, F>(records: &[R], validate: F) -> Result<()>
where
    F: Fn(&R) -> Result<()>,
{
    records.iter().try_for_each(validate)
}

fn replace_all<R: LedgerRecord>(store: &mut RecordStore, records: Vec<R>) -> Result<ApplyOutcome> {
    info!("Loaded {} {} records", records.len(), R::KIND);
    store.replace_all(records);
    Ok(ApplyOutcome::Applied)
}

fn replace_if_present<R: LedgerRecord>(store: &mut RecordStore, record: R) -> ApplyOutcome {
    let id = record.id().to_string();
    if store.replace_existing(record) {
        ApplyOutcome::Applied
    } else {
        not_found::<R>(&id)
    }
}

fn remove<R: LedgerRecord>(store: &mut RecordStore, id: &str) -> ApplyOutcome {
    if store.remove::<R>(id) {
        ApplyOutcome::Applied
    } else {
        ApplyOutcome::NotFoundLocally
    }
}

fn not_found<R: LedgerRecord>(id: &str) -> ApplyOutcome {
    debug!("{} '{}' is no longer held locally; confirmation ignored", R::KIND, id);
    ApplyOutcome::NotFoundLocally
}
