use super::*;
use crate::aggregates::Aggregator;
use crate::errors::Error;
use crate::expenses::Expense;
use crate::goals::Goal;
use crate::portfolio::PortfolioAsset;
use crate::records::{RecordKind, RecordStore};
use crate::test_fixtures::{asset, expense, goal, ids};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn apply(store: &mut RecordStore, mutation: Mutation) -> ApplyOutcome {
    MutationApplier::default()
        .apply(store, mutation)
        .expect("mutation should be accepted")
}

fn store_with_goal(target: Decimal, current: Decimal) -> RecordStore {
    let mut store = RecordStore::new();
    apply(&mut store, Mutation::GoalsLoaded(vec![goal("g1", target, current)]));
    store
}

// ============================================================================
// Expenses
// ============================================================================

#[test]
fn created_expenses_are_listed_newest_first() {
    let mut store = RecordStore::new();
    apply(
        &mut store,
        Mutation::ExpensesLoaded(vec![
            expense("e2", dec!(5), "food"),
            expense("e1", dec!(7), "fuel"),
        ]),
    );

    let outcome = apply(&mut store, Mutation::ExpenseCreated(expense("e3", dec!(9), "food")));

    assert_eq!(outcome, ApplyOutcome::Applied);
    assert_eq!(ids(store.expenses()), vec!["e3", "e2", "e1"]);
}

#[test]
fn repeated_create_confirmation_keeps_one_record() {
    let mut store = RecordStore::new();
    apply(&mut store, Mutation::ExpenseCreated(expense("e1", dec!(5), "food")));
    apply(&mut store, Mutation::ExpenseCreated(expense("e1", dec!(6), "food")));

    assert_eq!(store.expenses().len(), 1);
    assert_eq!(store.expenses()[0].amount, dec!(6));
}

#[test]
fn expense_update_replaces_in_place() {
    let mut store = RecordStore::new();
    apply(
        &mut store,
        Mutation::ExpensesLoaded(vec![
            expense("e1", dec!(1), "food"),
            expense("e2", dec!(2), "food"),
            expense("e3", dec!(3), "food"),
        ]),
    );

    apply(&mut store, Mutation::ExpenseUpdated(expense("e2", dec!(20), "fuel")));

    assert_eq!(ids(store.expenses()), vec!["e1", "e2", "e3"]);
    let updated = store.get::<Expense>("e2").unwrap();
    assert_eq!(updated.amount, dec!(20));
    assert_eq!(updated.category_id, "fuel");
}

#[test]
fn update_for_record_deleted_locally_is_a_no_op() {
    let mut store = RecordStore::new();
    apply(&mut store, Mutation::ExpensesLoaded(vec![expense("e1", dec!(1), "food")]));
    apply(&mut store, Mutation::ExpenseDeleted("e1".to_string()));

    let outcome = apply(&mut store, Mutation::ExpenseUpdated(expense("e1", dec!(4), "food")));

    assert_eq!(outcome, ApplyOutcome::NotFoundLocally);
    assert!(store.expenses().is_empty());
}

#[test]
fn deleting_absent_identity_leaves_collection_unchanged() {
    let mut store = RecordStore::new();
    apply(
        &mut store,
        Mutation::ExpensesLoaded(vec![
            expense("e1", dec!(1), "food"),
            expense("e2", dec!(2), "food"),
            expense("e3", dec!(3), "food"),
        ]),
    );
    let before = store.expenses().to_vec();

    let outcome = apply(&mut store, Mutation::ExpenseDeleted("missing".to_string()));

    assert_eq!(outcome, ApplyOutcome::NotFoundLocally);
    assert_eq!(store.expenses(), before.as_slice());
}

#[test]
fn rejected_list_is_not_partially_applied() {
    let mut store = RecordStore::new();
    apply(&mut store, Mutation::ExpensesLoaded(vec![expense("e1", dec!(1), "food")]));

    let result = MutationApplier::default().apply(
        &mut store,
        Mutation::ExpensesLoaded(vec![
            expense("e2", dec!(2), "food"),
            expense("e3", dec!(-3), "food"),
        ]),
    );

    assert!(matches!(result, Err(Error::Validation(_))));
    assert_eq!(ids(store.expenses()), vec!["e1"]);
}

#[test]
fn rejected_record_leaves_store_untouched() {
    let mut store = RecordStore::new();
    let mut bad = expense("e1", dec!(1), "food");
    bad.category_id = String::new();

    let result = MutationApplier::default().apply(&mut store, Mutation::ExpenseCreated(bad));

    assert!(result.is_err());
    assert!(store.expenses().is_empty());
}

#[test]
fn loaded_list_with_duplicate_ids_keeps_first_position() {
    let mut store = RecordStore::new();
    apply(
        &mut store,
        Mutation::ExpensesLoaded(vec![
            expense("e1", dec!(1), "food"),
            expense("e2", dec!(2), "food"),
            expense("e1", dec!(10), "food"),
        ]),
    );

    assert_eq!(ids(store.expenses()), vec!["e1", "e2"]);
    assert_eq!(store.get::<Expense>("e1").unwrap().amount, dec!(10));
}

// ============================================================================
// Goals
// ============================================================================

#[test]
fn goals_are_appended_at_the_tail() {
    let mut store = store_with_goal(dec!(1000), dec!(0));
    apply(&mut store, Mutation::GoalCreated(goal("g2", dec!(500), dec!(0))));
    assert_eq!(ids(store.goals()), vec!["g1", "g2"]);
}

#[test]
fn contribution_takes_service_amount_without_adding_again() {
    let mut store = store_with_goal(dec!(1000), dec!(400));

    // The service applied a contribution of 100 and returns the goal at 500.
    let outcome = apply(
        &mut store,
        Mutation::ContributionApplied(goal("g1", dec!(1000), dec!(500))),
    );

    assert_eq!(outcome, ApplyOutcome::Applied);
    let stored = store.get::<Goal>("g1").unwrap();
    assert_eq!(stored.current_amount, dec!(500));
    let progress = Aggregator::default().goal_progress(stored);
    assert_eq!(progress.progress_ratio, dec!(0.5));
}

#[test]
fn stale_contribution_result_is_ignored() {
    let mut store = store_with_goal(dec!(1000), dec!(600));

    let outcome = apply(
        &mut store,
        Mutation::ContributionApplied(goal("g1", dec!(1000), dec!(500))),
    );

    assert_eq!(outcome, ApplyOutcome::Stale);
    assert_eq!(store.get::<Goal>("g1").unwrap().current_amount, dec!(600));
}

#[test]
fn contribution_for_removed_goal_is_a_no_op() {
    let mut store = store_with_goal(dec!(1000), dec!(0));
    apply(&mut store, Mutation::GoalDeleted("g1".to_string()));

    let outcome = apply(
        &mut store,
        Mutation::ContributionApplied(goal("g1", dec!(1000), dec!(100))),
    );

    assert_eq!(outcome, ApplyOutcome::NotFoundLocally);
    assert!(store.goals().is_empty());
}

#[test]
fn goal_update_keeps_local_current_amount() {
    let mut store = store_with_goal(dec!(1000), dec!(400));
    let mut edited = goal("g1", dec!(2000), dec!(0));
    edited.goal_name = "Summer trip".to_string();

    apply(&mut store, Mutation::GoalUpdated(edited));

    let stored = store.get::<Goal>("g1").unwrap();
    assert_eq!(stored.goal_name, "Summer trip");
    assert_eq!(stored.target_amount, dec!(2000));
    assert_eq!(stored.current_amount, dec!(400));
}

// ============================================================================
// Portfolio
// ============================================================================

#[test]
fn asset_update_keeps_local_current_price() {
    let mut store = RecordStore::new();
    apply(
        &mut store,
        Mutation::AssetsLoaded(vec![asset("a1", dec!(10), dec!(100), dec!(150))]),
    );

    apply(
        &mut store,
        Mutation::AssetUpdated(asset("a1", dec!(12), dec!(100), dec!(90))),
    );

    let stored = store.get::<PortfolioAsset>("a1").unwrap();
    assert_eq!(stored.quantity, dec!(12));
    assert_eq!(stored.current_price, dec!(150));
}

#[test]
fn price_refresh_replaces_the_whole_portfolio() {
    let mut store = RecordStore::new();
    apply(
        &mut store,
        Mutation::AssetsLoaded(vec![
            asset("a1", dec!(1), dec!(10), dec!(10)),
            asset("a2", dec!(1), dec!(10), dec!(10)),
        ]),
    );

    apply(
        &mut store,
        Mutation::PricesRefreshed(vec![
            asset("a1", dec!(1), dec!(10), dec!(12)),
            asset("a2", dec!(1), dec!(10), dec!(8)),
        ]),
    );

    let prices: Vec<Decimal> = store.assets().iter().map(|a| a.current_price).collect();
    assert_eq!(prices, vec![dec!(12), dec!(8)]);
}

#[test]
fn ledger_recomputes_totals_after_asset_changes() {
    let applier = MutationApplier::default();
    let aggregator = Aggregator::default();
    let mut ledger = Ledger::new();

    ledger
        .apply(
            &applier,
            &aggregator,
            Mutation::AssetsLoaded(vec![
                asset("a1", dec!(10), dec!(100), dec!(150)),
                asset("a2", dec!(5), dec!(200), dec!(180)),
            ]),
        )
        .unwrap();
    assert_eq!(ledger.portfolio_totals().total_value, dec!(2400));
    assert_eq!(ledger.portfolio_totals().total_gain_loss_pct, dec!(20));

    ledger
        .apply(&applier, &aggregator, Mutation::AssetDeleted("a2".to_string()))
        .unwrap();
    assert_eq!(ledger.portfolio_totals().total_value, dec!(1500));
    assert_eq!(ledger.portfolio_totals().asset_count, 1);
}

// ============================================================================
// Budget
// ============================================================================

#[test]
fn budget_mutations_update_settings() {
    let mut store = RecordStore::new();

    apply(&mut store, Mutation::MonthlyBudgetSet(dec!(2000)));
    apply(
        &mut store,
        Mutation::CategoryBudgetSet {
            category_id: "food".to_string(),
            amount: dec!(400),
        },
    );
    assert_eq!(store.budget().monthly_total, Some(dec!(2000)));
    assert_eq!(store.budget().ceiling_for("food"), Some(dec!(400)));

    let outcome = apply(&mut store, Mutation::CategoryBudgetCleared("food".to_string()));
    assert_eq!(outcome, ApplyOutcome::Applied);
    assert_eq!(store.budget().ceiling_for("food"), None);

    let outcome = apply(&mut store, Mutation::CategoryBudgetCleared("food".to_string()));
    assert_eq!(outcome, ApplyOutcome::NotFoundLocally);
}

#[test]
fn negative_budget_is_rejected() {
    let mut store = RecordStore::new();
    let result = MutationApplier::default().apply(&mut store, Mutation::MonthlyBudgetSet(dec!(-1)));
    assert!(result.is_err());
    assert_eq!(store.budget().monthly_total, None);
}

#[test]
fn mutation_kinds_and_events() {
    let created = Mutation::ExpenseCreated(expense("e1", dec!(1), "food"));
    assert_eq!(created.kind(), Some(RecordKind::Expense));
    assert_eq!(created.events().len(), 1);
    assert_eq!(Mutation::MonthlyBudgetSet(dec!(1)).kind(), None);
    assert_eq!(
        Mutation::PricesRefreshed(vec![]).kind(),
        Some(RecordKind::PortfolioAsset)
    );
}
