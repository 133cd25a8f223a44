use chrono::NaiveDate;
use futures::join;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::ledger_state::{Ledger, LedgerSnapshot, SliceStatus};
use super::mutation::{ApplyOutcome, Mutation};
use super::mutation_applier::MutationApplier;
use crate::aggregates::{
    Aggregator, AssetPerformance, AssetTypeAllocation, BudgetUsage, GoalProgress,
    PortfolioAggregate,
};
use crate::budget::Budget;
use crate::constants::{
    CONTRIBUTION_FAILED, DELETE_ASSET_FAILED, DELETE_EXPENSE_FAILED, DELETE_GOAL_FAILED,
    FETCH_EXPENSES_FAILED, FETCH_GOALS_FAILED, FETCH_PORTFOLIO_FAILED, REFRESH_PRICES_FAILED,
    SAVE_ASSET_FAILED, SAVE_EXPENSE_FAILED, SAVE_GOAL_FAILED,
};
use crate::errors::{Error, Result};
use crate::events::{LedgerEvent, LedgerEventSink, NoOpEventSink};
use crate::expenses::{Expense, ExpenseFilters, ExpenseServiceTrait, ExpenseUpdate, NewExpense};
use crate::goals::{Goal, GoalServiceTrait, GoalUpdate, NewGoal};
use crate::portfolio::{
    NewPortfolioAsset, PortfolioAsset, PortfolioAssetUpdate, PortfolioServiceTrait,
};
use crate::records::RecordKind;
use crate::settings::LedgerSettings;

/// Failure of one kind during [`LedgerService::sync_all`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncFailure {
    pub kind: RecordKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Orchestrates record-service calls and the ledger state.
///
/// Each operation awaits the remote call first and only then takes the state
/// lock to apply the confirmed result; the lock is never held across an
/// `.await`. Calls on different record kinds run independently of each
/// other, and confirmations are applied in the order they arrive.
#[derive(Clone)]
pub struct LedgerService {
    expense_service: Arc<dyn ExpenseServiceTrait>,
    goal_service: Arc<dyn GoalServiceTrait>,
    portfolio_service: Arc<dyn PortfolioServiceTrait>,
    state: Arc<RwLock<Ledger>>,
    applier: MutationApplier,
    aggregator: Aggregator,
    event_sink: Arc<dyn LedgerEventSink>,
}

impl LedgerService {
    pub fn new(
        expense_service: Arc<dyn ExpenseServiceTrait>,
        goal_service: Arc<dyn GoalServiceTrait>,
        portfolio_service: Arc<dyn PortfolioServiceTrait>,
        settings: &LedgerSettings,
    ) -> Self {
        Self {
            expense_service,
            goal_service,
            portfolio_service,
            state: Arc::new(RwLock::new(Ledger::new())),
            applier: MutationApplier::new(settings),
            aggregator: Aggregator::new(settings),
            event_sink: Arc::new(NoOpEventSink),
        }
    }

    /// Sets the ledger event sink for this service.
    pub fn with_event_sink(mut self, event_sink: Arc<dyn LedgerEventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, Ledger>> {
        self.state
            .read()
            .map_err(|e| Error::StateUnavailable(e.to_string()))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, Ledger>> {
        self.state
            .write()
            .map_err(|e| Error::StateUnavailable(e.to_string()))
    }

    fn update_status<F>(&self, kind: RecordKind, update: F) -> Result<()>
    where
        F: FnOnce(&mut SliceStatus),
    {
        let mut state = self.write_state()?;
        update(state.status_mut(kind));
        Ok(())
    }

    fn note_failure(&self, kind: RecordKind, error: &Error, fallback: &str) {
        warn!("{} request failed: {}", kind, error);
        if let Err(e) = self.update_status(kind, |status| status.record_failure(error, fallback)) {
            warn!("Could not record {} failure: {}", kind, e);
        }
    }

    /// Applies a mutation and emits its events once the lock is released.
    fn commit(&self, mutation: Mutation) -> Result<ApplyOutcome> {
        let kind = mutation.kind();
        let events = mutation.events();

        let result = {
            let mut state = self.write_state()?;
            let result = state.apply(&self.applier, &self.aggregator, mutation);
            if let (Err(err), Some(kind)) = (&result, kind) {
                warn!("Rejected {} record from the service: {}", kind, err);
                let fallback = format!("Received an invalid {} record", kind);
                state.status_mut(kind).record_failure(err, &fallback);
            }
            result
        };

        let outcome = result?;
        if outcome.is_applied() {
            self.event_sink.emit_batch(events);
        }
        Ok(outcome)
    }

    async fn call_remote<T, Fut>(&self, kind: RecordKind, fallback: &str, request: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        let result = request.await;
        if let Err(err) = &result {
            self.note_failure(kind, err, fallback);
        }
        result
    }

    async fn fetch<R, Fut>(
        &self,
        kind: RecordKind,
        fallback: &str,
        request: Fut,
        loaded: fn(Vec<R>) -> Mutation,
    ) -> Result<()>
    where
        Fut: Future<Output = Result<Vec<R>>>,
    {
        self.update_status(kind, SliceStatus::begin_fetch)?;
        let result = request.await;
        self.update_status(kind, SliceStatus::end_fetch)?;

        let records = match result {
            Ok(records) => records,
            Err(err) => {
                self.note_failure(kind, &err, fallback);
                return Err(err);
            }
        };
        self.commit(loaded(records))?;
        Ok(())
    }

    fn log_outcome(&self, kind: RecordKind, id: &str, outcome: ApplyOutcome) {
        if !outcome.is_applied() {
            debug!("Confirmation for {} '{}' left the ledger unchanged ({:?})", kind, id, outcome);
        }
    }

    // ------------------------------------------------------------------
    // Expenses
    // ------------------------------------------------------------------

    pub async fn fetch_expenses(&self, filters: &ExpenseFilters) -> Result<()> {
        self.fetch(
            RecordKind::Expense,
            FETCH_EXPENSES_FAILED,
            self.expense_service.list(filters),
            Mutation::ExpensesLoaded,
        )
        .await
    }

    pub async fn add_expense(&self, new_expense: NewExpense) -> Result<Expense> {
        self.applier.validator().validate_new_expense(&new_expense)?;
        let created = self
            .call_remote(
                RecordKind::Expense,
                SAVE_EXPENSE_FAILED,
                self.expense_service.create(new_expense),
            )
            .await?;
        self.commit(Mutation::ExpenseCreated(created.clone()))?;
        Ok(created)
    }

    /// Returns the service's updated record. If the expense was deleted
    /// locally in the meantime the ledger is left as is.
    pub async fn update_expense(
        &self,
        expense_id: &str,
        changes: ExpenseUpdate,
    ) -> Result<Expense> {
        self.applier
            .validator()
            .validate_expense_update(expense_id, &changes)?;
        let updated = self
            .call_remote(
                RecordKind::Expense,
                SAVE_EXPENSE_FAILED,
                self.expense_service.update(expense_id, changes),
            )
            .await?;
        let outcome = self.commit(Mutation::ExpenseUpdated(updated.clone()))?;
        self.log_outcome(RecordKind::Expense, expense_id, outcome);
        Ok(updated)
    }

    pub async fn delete_expense(&self, expense_id: &str) -> Result<()> {
        self.applier.validator().validate_identity(expense_id)?;
        self.call_remote(
            RecordKind::Expense,
            DELETE_EXPENSE_FAILED,
            self.expense_service.delete(expense_id),
        )
        .await?;
        let outcome = self.commit(Mutation::ExpenseDeleted(expense_id.to_string()))?;
        self.log_outcome(RecordKind::Expense, expense_id, outcome);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Budget (local settings, no remote call)
    // ------------------------------------------------------------------

    pub fn set_monthly_budget(&self, amount: Decimal) -> Result<()> {
        self.commit(Mutation::MonthlyBudgetSet(amount)).map(|_| ())
    }

    pub fn set_category_budget(&self, category_id: &str, amount: Decimal) -> Result<()> {
        self.commit(Mutation::CategoryBudgetSet {
            category_id: category_id.to_string(),
            amount,
        })
        .map(|_| ())
    }

    /// Removes a category ceiling; clearing an absent one is not an error.
    pub fn clear_category_budget(&self, category_id: &str) -> Result<()> {
        self.commit(Mutation::CategoryBudgetCleared(category_id.to_string()))
            .map(|_| ())
    }

    // ------------------------------------------------------------------
    // Goals
    // ------------------------------------------------------------------

    pub async fn fetch_goals(&self) -> Result<()> {
        self.fetch(
            RecordKind::Goal,
            FETCH_GOALS_FAILED,
            self.goal_service.list(),
            Mutation::GoalsLoaded,
        )
        .await
    }

    pub async fn add_goal(&self, new_goal: NewGoal) -> Result<Goal> {
        self.applier.validator().validate_new_goal(&new_goal)?;
        let created = self
            .call_remote(
                RecordKind::Goal,
                SAVE_GOAL_FAILED,
                self.goal_service.create(new_goal),
            )
            .await?;
        self.commit(Mutation::GoalCreated(created.clone()))?;
        Ok(created)
    }

    pub async fn update_goal(&self, goal_id: &str, changes: GoalUpdate) -> Result<Goal> {
        self.applier
            .validator()
            .validate_goal_update(goal_id, &changes)?;
        let updated = self
            .call_remote(
                RecordKind::Goal,
                SAVE_GOAL_FAILED,
                self.goal_service.update(goal_id, changes),
            )
            .await?;
        let outcome = self.commit(Mutation::GoalUpdated(updated.clone()))?;
        self.log_outcome(RecordKind::Goal, goal_id, outcome);
        Ok(updated)
    }

    pub async fn delete_goal(&self, goal_id: &str) -> Result<()> {
        self.applier.validator().validate_identity(goal_id)?;
        self.call_remote(
            RecordKind::Goal,
            DELETE_GOAL_FAILED,
            self.goal_service.delete(goal_id),
        )
        .await?;
        let outcome = self.commit(Mutation::GoalDeleted(goal_id.to_string()))?;
        self.log_outcome(RecordKind::Goal, goal_id, outcome);
        Ok(())
    }

    /// Sends a contribution and stores the goal the service returns. The
    /// current amount is never advanced locally.
    pub async fn add_contribution(&self, goal_id: &str, amount: Decimal) -> Result<Goal> {
        self.applier
            .validator()
            .validate_contribution(goal_id, amount)?;
        let goal = self
            .call_remote(
                RecordKind::Goal,
                CONTRIBUTION_FAILED,
                self.goal_service.add_contribution(goal_id, amount),
            )
            .await?;
        let outcome = self.commit(Mutation::ContributionApplied(goal.clone()))?;
        self.log_outcome(RecordKind::Goal, goal_id, outcome);
        Ok(goal)
    }

    // ------------------------------------------------------------------
    // Portfolio
    // ------------------------------------------------------------------

    pub async fn fetch_portfolio(&self) -> Result<()> {
        self.fetch(
            RecordKind::PortfolioAsset,
            FETCH_PORTFOLIO_FAILED,
            self.portfolio_service.list(),
            Mutation::AssetsLoaded,
        )
        .await
    }

    pub async fn add_asset(&self, new_asset: NewPortfolioAsset) -> Result<PortfolioAsset> {
        self.applier.validator().validate_new_asset(&new_asset)?;
        let created = self
            .call_remote(
                RecordKind::PortfolioAsset,
                SAVE_ASSET_FAILED,
                self.portfolio_service.create(new_asset),
            )
            .await?;
        self.commit(Mutation::AssetCreated(created.clone()))?;
        Ok(created)
    }

    pub async fn update_asset(
        &self,
        asset_id: &str,
        changes: PortfolioAssetUpdate,
    ) -> Result<PortfolioAsset> {
        self.applier
            .validator()
            .validate_asset_update(asset_id, &changes)?;
        let updated = self
            .call_remote(
                RecordKind::PortfolioAsset,
                SAVE_ASSET_FAILED,
                self.portfolio_service.update(asset_id, changes),
            )
            .await?;
        let outcome = self.commit(Mutation::AssetUpdated(updated.clone()))?;
        self.log_outcome(RecordKind::PortfolioAsset, asset_id, outcome);
        Ok(updated)
    }

    pub async fn delete_asset(&self, asset_id: &str) -> Result<()> {
        self.applier.validator().validate_identity(asset_id)?;
        self.call_remote(
            RecordKind::PortfolioAsset,
            DELETE_ASSET_FAILED,
            self.portfolio_service.delete(asset_id),
        )
        .await?;
        let outcome = self.commit(Mutation::AssetDeleted(asset_id.to_string()))?;
        self.log_outcome(RecordKind::PortfolioAsset, asset_id, outcome);
        Ok(())
    }

    pub async fn refresh_prices(&self) -> Result<()> {
        let repriced = self
            .call_remote(
                RecordKind::PortfolioAsset,
                REFRESH_PRICES_FAILED,
                self.portfolio_service.refresh_prices(),
            )
            .await?;
        self.commit(Mutation::PricesRefreshed(repriced))?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    /// Fetches all three kinds concurrently. A failure of one kind does not
    /// stop the others.
    pub async fn sync_all(&self, expense_filters: &ExpenseFilters) -> SyncReport {
        let (expenses, goals, assets) = join!(
            self.fetch_expenses(expense_filters),
            self.fetch_goals(),
            self.fetch_portfolio()
        );

        let failures = [
            (RecordKind::Expense, expenses),
            (RecordKind::Goal, goals),
            (RecordKind::PortfolioAsset, assets),
        ]
        .into_iter()
        .filter_map(|(kind, result)| {
            result.err().map(|err| SyncFailure {
                kind,
                message: err.to_string(),
            })
        })
        .collect();

        SyncReport { failures }
    }

    pub fn clear_error(&self, kind: RecordKind) -> Result<()> {
        self.update_status(kind, |status| status.error = None)
    }

    /// Forgets every record, budget setting and status, e.g. on sign-out.
    pub fn reset(&self) -> Result<()> {
        self.write_state()?.reset();
        self.event_sink.emit_batch(
            RecordKind::ALL
                .into_iter()
                .map(|kind| LedgerEvent::RecordsReplaced {
                    kind,
                    record_count: 0,
                })
                .collect(),
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn expenses(&self) -> Result<Vec<Expense>> {
        Ok(self.read_state()?.store().expenses().to_vec())
    }

    pub fn goals(&self) -> Result<Vec<Goal>> {
        Ok(self.read_state()?.store().goals().to_vec())
    }

    pub fn assets(&self) -> Result<Vec<PortfolioAsset>> {
        Ok(self.read_state()?.store().assets().to_vec())
    }

    pub fn budget(&self) -> Result<Budget> {
        Ok(self.read_state()?.store().budget().clone())
    }

    pub fn status(&self, kind: RecordKind) -> Result<SliceStatus> {
        Ok(self.read_state()?.status(kind).clone())
    }

    pub fn portfolio_totals(&self) -> Result<PortfolioAggregate> {
        Ok(self.read_state()?.portfolio_totals().clone())
    }

    pub fn asset_performance(&self) -> Result<Vec<AssetPerformance>> {
        let state = self.read_state()?;
        Ok(state
            .store()
            .assets()
            .iter()
            .map(|asset| self.aggregator.asset_performance(asset))
            .collect())
    }

    pub fn allocation_by_type(&self) -> Result<Vec<AssetTypeAllocation>> {
        let state = self.read_state()?;
        Ok(self.aggregator.allocation_by_type(state.store().assets()))
    }

    /// Usage over every expense currently loaded.
    pub fn budget_usage(&self) -> Result<BudgetUsage> {
        let state = self.read_state()?;
        let store = state.store();
        Ok(self.aggregator.budget_usage(store.expenses(), store.budget()))
    }

    /// Usage over the loaded expenses recorded in the month containing `month`.
    pub fn monthly_budget_usage(&self, month: NaiveDate) -> Result<BudgetUsage> {
        let state = self.read_state()?;
        let store = state.store();
        Ok(self
            .aggregator
            .monthly_budget_usage(store.expenses(), store.budget(), month))
    }

    pub fn goal_progress(&self, goal_id: &str) -> Result<Option<GoalProgress>> {
        let state = self.read_state()?;
        Ok(state
            .store()
            .get::<Goal>(goal_id)
            .map(|goal| self.aggregator.goal_progress(goal)))
    }

    pub fn goals_progress(&self) -> Result<Vec<GoalProgress>> {
        let state = self.read_state()?;
        Ok(self.aggregator.goals_progress(state.store().goals()))
    }

    pub fn snapshot(&self) -> Result<LedgerSnapshot> {
        Ok(self.read_state()?.snapshot())
    }
}
