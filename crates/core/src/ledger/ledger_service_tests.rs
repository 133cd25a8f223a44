use super::*;
use crate::constants::FETCH_GOALS_FAILED;
use crate::errors::{Error, RemoteError, Result};
use crate::events::{LedgerEvent, RecordingEventSink};
use crate::expenses::{Expense, ExpenseFilters, ExpenseServiceTrait, ExpenseUpdate, NewExpense};
use crate::gateway::InMemoryRecordService;
use crate::goals::{Goal, GoalServiceTrait, GoalUpdate, NewGoal};
use crate::portfolio::{AssetType, NewPortfolioAsset, PortfolioAssetUpdate, PortfolioServiceTrait};
use crate::records::RecordKind;
use crate::settings::LedgerSettings;
use crate::test_fixtures::{asset, expense, goal, ids};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tokio::sync::Semaphore;

// ============================================================================
// Test doubles
// ============================================================================

/// Goal service whose every call fails with an empty message.
struct FailingGoalService;

#[async_trait]
impl GoalServiceTrait for FailingGoalService {
    async fn list(&self) -> Result<Vec<Goal>> {
        Err(RemoteError::RequestFailed(String::new()).into())
    }
    async fn create(&self, _new_goal: NewGoal) -> Result<Goal> {
        Err(RemoteError::RequestFailed(String::new()).into())
    }
    async fn update(&self, _goal_id: &str, _changes: GoalUpdate) -> Result<Goal> {
        Err(RemoteError::RequestFailed(String::new()).into())
    }
    async fn delete(&self, _goal_id: &str) -> Result<()> {
        Err(RemoteError::RequestFailed(String::new()).into())
    }
    async fn add_contribution(&self, _goal_id: &str, _amount: Decimal) -> Result<Goal> {
        Err(RemoteError::RequestFailed(String::new()).into())
    }
}

/// Expense service whose listing waits until the test releases a permit.
struct GatedExpenseService {
    gate: Arc<Semaphore>,
    expenses: Vec<Expense>,
}

#[async_trait]
impl ExpenseServiceTrait for GatedExpenseService {
    async fn list(&self, _filters: &ExpenseFilters) -> Result<Vec<Expense>> {
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| Error::Unexpected(e.to_string()))?;
        Ok(self.expenses.clone())
    }
    async fn create(&self, _new_expense: NewExpense) -> Result<Expense> {
        Err(Error::Unexpected("not used".to_string()))
    }
    async fn update(&self, _expense_id: &str, _changes: ExpenseUpdate) -> Result<Expense> {
        Err(Error::Unexpected("not used".to_string()))
    }
    async fn delete(&self, _expense_id: &str) -> Result<()> {
        Err(Error::Unexpected("not used".to_string()))
    }
}

fn ledger_for(backend: &InMemoryRecordService) -> (LedgerService, Arc<RecordingEventSink>) {
    let backend = Arc::new(backend.clone());
    let sink = Arc::new(RecordingEventSink::new());
    let service = LedgerService::new(
        backend.clone(),
        backend.clone(),
        backend,
        &LedgerSettings::default(),
    )
    .with_event_sink(sink.clone());
    (service, sink)
}

fn new_expense(amount: Decimal, category_id: &str) -> NewExpense {
    NewExpense {
        amount,
        category_id: category_id.to_string(),
        description: "Weekly shop".to_string(),
        store_name: "Corner Shop".to_string(),
        receipt_image_url: None,
        location: None,
    }
}

fn new_asset(symbol: &str, quantity: Decimal, purchase_price: Decimal) -> NewPortfolioAsset {
    NewPortfolioAsset {
        symbol: symbol.to_string(),
        asset_type: AssetType::Equity,
        quantity,
        purchase_price,
        purchase_date: NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
    }
}

// ============================================================================
// Loading
// ============================================================================

#[tokio::test]
async fn sync_all_loads_every_kind_and_totals() {
    let backend = InMemoryRecordService::new();
    backend.seed_expenses(vec![expense("e2", dec!(20), "food"), expense("e1", dec!(10), "fuel")]);
    backend.seed_goals(vec![goal("g1", dec!(1000), dec!(250))]);
    backend.seed_assets(vec![
        asset("a1", dec!(10), dec!(100), dec!(150)),
        asset("a2", dec!(5), dec!(200), dec!(180)),
    ]);
    let (service, sink) = ledger_for(&backend);

    let report = service.sync_all(&ExpenseFilters::default()).await;

    assert!(report.is_complete());
    assert_eq!(ids(&service.expenses().unwrap()), vec!["e2", "e1"]);
    assert_eq!(service.goals().unwrap().len(), 1);

    let totals = service.portfolio_totals().unwrap();
    assert_eq!(totals.total_value, dec!(2400));
    assert_eq!(totals.total_cost, dec!(2000));
    assert_eq!(totals.total_gain_loss, dec!(400));
    assert_eq!(totals.total_gain_loss_pct, dec!(20));

    let replaced = sink
        .events()
        .into_iter()
        .filter(|e| matches!(e, LedgerEvent::RecordsReplaced { .. }))
        .count();
    assert_eq!(replaced, 3);
}

#[tokio::test]
async fn failing_kind_does_not_block_the_others() {
    let backend = Arc::new(InMemoryRecordService::new());
    backend.seed_expenses(vec![expense("e1", dec!(10), "food")]);
    let service = LedgerService::new(
        backend.clone(),
        Arc::new(FailingGoalService),
        backend,
        &LedgerSettings::default(),
    );

    let report = service.sync_all(&ExpenseFilters::default()).await;

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind, RecordKind::Goal);
    assert_eq!(service.expenses().unwrap().len(), 1);

    let goal_status = service.status(RecordKind::Goal).unwrap();
    assert!(!goal_status.is_loading());
    assert_eq!(goal_status.error.as_deref(), Some(FETCH_GOALS_FAILED));
    assert_eq!(service.status(RecordKind::Expense).unwrap().error, None);
}

#[tokio::test]
async fn loading_is_tracked_per_kind_while_fetches_are_pending() {
    let gate = Arc::new(Semaphore::new(0));
    let backend = Arc::new(InMemoryRecordService::new());
    backend.seed_goals(vec![goal("g1", dec!(500), dec!(0))]);
    let expenses = Arc::new(GatedExpenseService {
        gate: gate.clone(),
        expenses: vec![expense("e1", dec!(10), "food")],
    });
    let service = LedgerService::new(
        expenses,
        backend.clone(),
        backend,
        &LedgerSettings::default(),
    );
    let filters = ExpenseFilters::default();

    let (first, second, ()) = futures::join!(
        service.fetch_expenses(&filters),
        service.fetch_expenses(&filters),
        async {
            tokio::task::yield_now().await;
            let status = service.status(RecordKind::Expense).unwrap();
            assert!(status.is_loading());
            assert_eq!(status.in_flight, 2);

            // Goals are fetched and applied while expenses are still pending.
            service.fetch_goals().await.unwrap();
            assert!(!service.status(RecordKind::Goal).unwrap().is_loading());
            assert_eq!(service.goals().unwrap().len(), 1);
            assert!(service.expenses().unwrap().is_empty());

            gate.add_permits(1);
        }
    );

    first.unwrap();
    second.unwrap();
    assert!(!service.status(RecordKind::Expense).unwrap().is_loading());
    assert_eq!(ids(&service.expenses().unwrap()), vec!["e1"]);
}

#[tokio::test]
async fn successful_fetch_clears_previous_error() {
    let backend = InMemoryRecordService::new();
    let (service, _sink) = ledger_for(&backend);

    backend.set_offline(true);
    assert!(service.fetch_portfolio().await.is_err());
    let status = service.status(RecordKind::PortfolioAsset).unwrap();
    assert!(status.error.unwrap().contains("offline"));

    backend.set_offline(false);
    service.fetch_portfolio().await.unwrap();
    assert_eq!(service.status(RecordKind::PortfolioAsset).unwrap().error, None);
}

// ============================================================================
// Expenses and budget
// ============================================================================

#[tokio::test]
async fn added_expense_appears_first_and_is_announced() {
    let backend = InMemoryRecordService::new();
    backend.seed_expenses(vec![expense("e1", dec!(10), "food")]);
    let (service, sink) = ledger_for(&backend);
    service.fetch_expenses(&ExpenseFilters::default()).await.unwrap();
    sink.take();

    let created = service.add_expense(new_expense(dec!(42.10), "food")).await.unwrap();

    let expenses = service.expenses().unwrap();
    assert_eq!(expenses[0].id, created.id);
    assert_eq!(expenses.len(), 2);
    assert_eq!(
        sink.events(),
        vec![LedgerEvent::records_changed(RecordKind::Expense, created.id.clone())]
    );
}

#[tokio::test]
async fn invalid_expense_is_rejected_before_the_call() {
    let backend = InMemoryRecordService::new();
    let (service, sink) = ledger_for(&backend);

    let err = service
        .add_expense(new_expense(dec!(-5), "food"))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    let remote = ExpenseServiceTrait::list(&backend, &ExpenseFilters::default())
        .await
        .unwrap();
    assert!(remote.is_empty());
    assert!(service.expenses().unwrap().is_empty());
    assert!(sink.is_empty());
}

#[tokio::test]
async fn failed_save_keeps_local_records_and_reports_error() {
    let backend = InMemoryRecordService::new();
    backend.seed_expenses(vec![expense("e1", dec!(10), "food")]);
    let (service, _sink) = ledger_for(&backend);
    service.fetch_expenses(&ExpenseFilters::default()).await.unwrap();

    backend.set_offline(true);
    let err = service.add_expense(new_expense(dec!(5), "food")).await.unwrap_err();

    assert!(err.is_remote());
    assert_eq!(ids(&service.expenses().unwrap()), vec!["e1"]);
    assert!(service.status(RecordKind::Expense).unwrap().error.is_some());

    service.clear_error(RecordKind::Expense).unwrap();
    assert_eq!(service.status(RecordKind::Expense).unwrap().error, None);
}

#[tokio::test]
async fn update_and_delete_expense() {
    let backend = InMemoryRecordService::new();
    backend.seed_expenses(vec![expense("e2", dec!(20), "food"), expense("e1", dec!(10), "food")]);
    let (service, _sink) = ledger_for(&backend);
    service.fetch_expenses(&ExpenseFilters::default()).await.unwrap();

    let updated = service
        .update_expense(
            "e1",
            ExpenseUpdate {
                amount: Some(dec!(12.75)),
                ..ExpenseUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.amount, dec!(12.75));
    assert_eq!(ids(&service.expenses().unwrap()), vec!["e2", "e1"]);
    assert_eq!(service.expenses().unwrap()[1].amount, dec!(12.75));

    service.delete_expense("e2").await.unwrap();
    assert_eq!(ids(&service.expenses().unwrap()), vec!["e1"]);
}

#[tokio::test]
async fn budget_usage_reflects_loaded_expenses() {
    let backend = InMemoryRecordService::new();
    backend.seed_expenses(vec![
        expense("e1", dec!(300), "food"),
        expense("e2", dec!(150), "food"),
        expense("e3", dec!(80), "fuel"),
    ]);
    let (service, sink) = ledger_for(&backend);
    service.fetch_expenses(&ExpenseFilters::default()).await.unwrap();

    service.set_monthly_budget(dec!(2000)).unwrap();
    service.set_category_budget("food", dec!(400)).unwrap();

    let usage = service.budget_usage().unwrap();
    assert_eq!(usage.total_spent, dec!(530));
    assert_eq!(usage.remaining, Some(dec!(1470)));
    assert!(!usage.is_over_budget);
    assert!(usage.category("food").unwrap().is_over_budget);
    assert!(!usage.category("fuel").unwrap().is_over_budget);

    // Fixture expenses are recorded in May 2024.
    let may = service
        .monthly_budget_usage(NaiveDate::from_ymd_opt(2024, 5, 20).unwrap())
        .unwrap();
    assert_eq!(may.total_spent, dec!(530));
    let june = service
        .monthly_budget_usage(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
        .unwrap();
    assert_eq!(june.total_spent, Decimal::ZERO);

    service.clear_category_budget("food").unwrap();
    assert_eq!(service.budget().unwrap().ceiling_for("food"), None);
    assert!(sink
        .events()
        .contains(&LedgerEvent::BudgetChanged { category_id: None }));

    assert!(service.set_category_budget("", dec!(10)).is_err());
}

// ============================================================================
// Goals
// ============================================================================

#[tokio::test]
async fn contribution_is_counted_once() {
    let backend = InMemoryRecordService::new();
    backend.seed_goals(vec![goal("g1", dec!(1000), dec!(400))]);
    let (service, sink) = ledger_for(&backend);
    service.fetch_goals().await.unwrap();

    let confirmed = service.add_contribution("g1", dec!(100)).await.unwrap();

    assert_eq!(confirmed.current_amount, dec!(500));
    let progress = service.goal_progress("g1").unwrap().unwrap();
    assert_eq!(progress.progress_ratio, dec!(0.5));
    assert_eq!(progress.remaining_amount, dec!(500));
    assert!(sink.events().contains(&LedgerEvent::ContributionRecorded {
        goal_id: "g1".to_string(),
        current_amount: dec!(500),
    }));
}

#[tokio::test]
async fn non_positive_contribution_is_rejected_locally() {
    let backend = InMemoryRecordService::new();
    backend.seed_goals(vec![goal("g1", dec!(1000), dec!(400))]);
    let (service, _sink) = ledger_for(&backend);
    service.fetch_goals().await.unwrap();

    let err = service.add_contribution("g1", Decimal::ZERO).await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(service.goals().unwrap()[0].current_amount, dec!(400));
}

#[tokio::test]
async fn goal_lifecycle() {
    let backend = InMemoryRecordService::new();
    let (service, _sink) = ledger_for(&backend);

    let created = service
        .add_goal(NewGoal {
            user_id: "user-1".to_string(),
            family_id: "family-1".to_string(),
            goal_name: "New car".to_string(),
            target_amount: dec!(8000),
            deadline: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            monthly_contribution: dec!(400),
        })
        .await
        .unwrap();
    assert_eq!(created.current_amount, Decimal::ZERO);

    service
        .update_goal(
            &created.id,
            GoalUpdate {
                target_amount: Some(dec!(6000)),
                ..GoalUpdate::default()
            },
        )
        .await
        .unwrap();
    let progress = service.goal_progress(&created.id).unwrap().unwrap();
    assert_eq!(progress.remaining_amount, dec!(6000));
    assert_eq!(progress.months_to_target, Some(15));

    service.delete_goal(&created.id).await.unwrap();
    assert!(service.goals().unwrap().is_empty());
    assert!(service.goal_progress(&created.id).unwrap().is_none());
}

// ============================================================================
// Portfolio
// ============================================================================

#[tokio::test]
async fn asset_changes_keep_totals_current() {
    let backend = InMemoryRecordService::new();
    backend.set_market_price("AAPL", dec!(150));
    let (service, _sink) = ledger_for(&backend);

    let created = service
        .add_asset(new_asset("AAPL", dec!(10), dec!(100)))
        .await
        .unwrap();
    assert_eq!(service.portfolio_totals().unwrap().total_value, dec!(1500));

    backend.set_market_price("AAPL", dec!(120));
    service
        .update_asset(
            &created.id,
            PortfolioAssetUpdate {
                quantity: Some(dec!(20)),
                ..PortfolioAssetUpdate::default()
            },
        )
        .await
        .unwrap();
    // Editing a holding does not reprice it.
    let totals = service.portfolio_totals().unwrap();
    assert_eq!(totals.total_value, dec!(3000));
    assert_eq!(totals.total_cost, dec!(2000));

    service.refresh_prices().await.unwrap();
    let totals = service.portfolio_totals().unwrap();
    assert_eq!(totals.total_value, dec!(2400));
    assert_eq!(totals.total_gain_loss_pct, dec!(20));

    let allocation = service.allocation_by_type().unwrap();
    assert_eq!(allocation.len(), 1);
    assert_eq!(allocation[0].asset_type, AssetType::Equity);
    assert_eq!(service.asset_performance().unwrap()[0].gain_loss, dec!(400));

    service.delete_asset(&created.id).await.unwrap();
    assert_eq!(service.portfolio_totals().unwrap().total_value, Decimal::ZERO);
}

#[tokio::test]
async fn oversized_holding_is_rejected_and_ledger_stays_usable() {
    let backend = InMemoryRecordService::new();
    let huge = dec!(1000000000000000);
    let (service, _sink) = ledger_for(&backend);

    let err = service
        .add_asset(new_asset("BIG", huge, huge))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    let remote = PortfolioServiceTrait::list(&backend).await.unwrap();
    assert!(remote.is_empty());

    // A record the service already holds is refused when it is loaded.
    backend.seed_assets(vec![asset("a1", huge, dec!(1), huge)]);
    let err = service.fetch_portfolio().await.unwrap_err();
    assert!(err.is_validation());
    assert!(service
        .status(RecordKind::PortfolioAsset)
        .unwrap()
        .error
        .is_some());

    assert!(service.assets().unwrap().is_empty());
    assert_eq!(service.portfolio_totals().unwrap().total_value, Decimal::ZERO);
    assert!(service.expenses().is_ok());
    service.set_monthly_budget(dec!(100)).unwrap();
}

// ============================================================================
// Session
// ============================================================================

#[tokio::test]
async fn reset_forgets_everything() {
    let backend = InMemoryRecordService::new();
    backend.seed_expenses(vec![expense("e1", dec!(10), "food")]);
    backend.seed_assets(vec![asset("a1", dec!(1), dec!(10), dec!(12))]);
    let (service, sink) = ledger_for(&backend);
    service.sync_all(&ExpenseFilters::default()).await;
    service.set_monthly_budget(dec!(500)).unwrap();
    sink.take();

    service.reset().unwrap();

    let snapshot = service.snapshot().unwrap();
    assert!(snapshot.expenses.is_empty());
    assert!(snapshot.assets.is_empty());
    assert_eq!(snapshot.budget.monthly_total, None);
    assert_eq!(snapshot.portfolio_totals.total_value, Decimal::ZERO);
    assert_eq!(sink.len(), 3);
}
