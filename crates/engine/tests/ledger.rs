use chrono::{TimeZone, Utc};
use sea_orm::{ConnectionTrait, Database, Statement};
use uuid::Uuid;

use engine::{Currency, Engine, EngineError, GoalPatch};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["alice".into(), "password".into()],
    ))
    .await
    .unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

#[tokio::test]
async fn income_and_expense_move_the_balance() {
    let engine = engine_with_db().await;
    let account_id = engine
        .new_account("alice", "Checking", Currency::Eur, 0)
        .await
        .unwrap();

    engine
        .income("alice", account_id, 1000, None, Some("January"), Utc::now())
        .await
        .unwrap();
    engine
        .expense("alice", account_id, 250, None, None, Utc::now())
        .await
        .unwrap();

    let account = engine.account("alice", account_id).await.unwrap();
    assert_eq!(account.balance_minor, 750);
}

#[tokio::test]
async fn transfer_moves_money_between_same_currency_accounts() {
    let engine = engine_with_db().await;
    let checking = engine
        .new_account("alice", "Checking", Currency::Usd, 5000)
        .await
        .unwrap();
    let savings = engine
        .new_account("alice", "Savings", Currency::Usd, 0)
        .await
        .unwrap();

    engine
        .transfer("alice", checking, savings, 2000, Some("stash"), Utc::now())
        .await
        .unwrap();

    assert_eq!(
        engine.account("alice", checking).await.unwrap().balance_minor,
        3000
    );
    assert_eq!(
        engine.account("alice", savings).await.unwrap().balance_minor,
        2000
    );
}

#[tokio::test]
async fn transfer_rejects_currency_mismatch() {
    let engine = engine_with_db().await;
    let eur = engine
        .new_account("alice", "Euro", Currency::Eur, 1000)
        .await
        .unwrap();
    let jpy = engine
        .new_account("alice", "Yen", Currency::Jpy, 1000)
        .await
        .unwrap();

    let err = engine
        .transfer("alice", eur, jpy, 100, None, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::CurrencyMismatch(_)));

    // Nothing moved.
    assert_eq!(engine.account("alice", eur).await.unwrap().balance_minor, 1000);
    assert_eq!(engine.account("alice", jpy).await.unwrap().balance_minor, 1000);
}

#[tokio::test]
async fn void_reverts_balances_and_hides_the_row() {
    let engine = engine_with_db().await;
    let account_id = engine
        .new_account("alice", "Checking", Currency::Eur, 0)
        .await
        .unwrap();

    let tx_id = engine
        .income("alice", account_id, 1000, None, None, Utc::now())
        .await
        .unwrap();
    engine
        .void_transaction("alice", tx_id, Utc::now())
        .await
        .unwrap();

    assert_eq!(
        engine.account("alice", account_id).await.unwrap().balance_minor,
        0
    );

    let visible = engine
        .list_transactions("alice", account_id, 50, false)
        .await
        .unwrap();
    assert!(visible.is_empty());

    let all = engine
        .list_transactions("alice", account_id, 50, true)
        .await
        .unwrap();
    assert_eq!(all.len(), 1);

    // A second void must fail.
    let err = engine
        .void_transaction("alice", tx_id, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn update_transaction_adjusts_balances_by_the_delta() {
    let engine = engine_with_db().await;
    let account_id = engine
        .new_account("alice", "Checking", Currency::Eur, 0)
        .await
        .unwrap();

    let tx_id = engine
        .expense("alice", account_id, 300, None, Some("groceries"), Utc::now())
        .await
        .unwrap();
    engine
        .update_transaction("alice", tx_id, 500, None, Some("groceries"), None)
        .await
        .unwrap();

    assert_eq!(
        engine.account("alice", account_id).await.unwrap().balance_minor,
        -500
    );
}

#[tokio::test]
async fn transfers_show_signed_amounts_on_both_sides() {
    let engine = engine_with_db().await;
    let checking = engine
        .new_account("alice", "Checking", Currency::Usd, 5000)
        .await
        .unwrap();
    let savings = engine
        .new_account("alice", "Savings", Currency::Usd, 0)
        .await
        .unwrap();
    engine
        .transfer("alice", checking, savings, 2000, None, Utc::now())
        .await
        .unwrap();

    let from_side = engine
        .list_transactions("alice", checking, 10, false)
        .await
        .unwrap();
    assert_eq!(from_side[0].1, -2000);

    let to_side = engine
        .list_transactions("alice", savings, 10, false)
        .await
        .unwrap();
    assert_eq!(to_side[0].1, 2000);
}

#[tokio::test]
async fn duplicate_account_name_conflicts() {
    let engine = engine_with_db().await;
    engine
        .new_account("alice", "Checking", Currency::Eur, 0)
        .await
        .unwrap();
    let err = engine
        .new_account("alice", "Checking", Currency::Usd, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn foreign_accounts_surface_as_not_found() {
    let engine = engine_with_db().await;
    let account_id = engine
        .new_account("alice", "Checking", Currency::Eur, 0)
        .await
        .unwrap();

    let err = engine.account("bob", account_id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine
        .income("bob", account_id, 100, None, None, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let missing = engine.account("alice", Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(missing, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn budget_spent_tracks_the_category_month_and_currency() {
    let engine = engine_with_db().await;
    let account_id = engine
        .new_account("alice", "Checking", Currency::Eur, 100_000)
        .await
        .unwrap();
    let groceries = engine.new_category("alice", "Groceries").await.unwrap();
    let fun = engine.new_category("alice", "Fun").await.unwrap();

    engine
        .new_budget("alice", groceries, "2026-01", 50_000, Currency::Eur)
        .await
        .unwrap();

    let in_month = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
    let out_of_month = Utc.with_ymd_and_hms(2026, 2, 2, 12, 0, 0).unwrap();

    engine
        .expense("alice", account_id, 12_00, Some(groceries), None, in_month)
        .await
        .unwrap();
    engine
        .expense("alice", account_id, 8_00, Some(groceries), None, in_month)
        .await
        .unwrap();
    // Different category and different month must not count.
    engine
        .expense("alice", account_id, 99_00, Some(fun), None, in_month)
        .await
        .unwrap();
    engine
        .expense("alice", account_id, 77_00, Some(groceries), None, out_of_month)
        .await
        .unwrap();
    // Voided expenses must not count either.
    let voided = engine
        .expense("alice", account_id, 5_00, Some(groceries), None, in_month)
        .await
        .unwrap();
    engine
        .void_transaction("alice", voided, Utc::now())
        .await
        .unwrap();

    let budgets = engine.list_budgets("alice", "2026-01").await.unwrap();
    assert_eq!(budgets.len(), 1);
    let (budget, spent) = &budgets[0];
    assert_eq!(budget.category_id, groceries);
    assert_eq!(*spent, 20_00);
}

#[tokio::test]
async fn duplicate_budget_for_month_conflicts() {
    let engine = engine_with_db().await;
    let groceries = engine.new_category("alice", "Groceries").await.unwrap();
    engine
        .new_budget("alice", groceries, "2026-01", 50_000, Currency::Eur)
        .await
        .unwrap();
    let err = engine
        .new_budget("alice", groceries, "2026-01", 10_000, Currency::Eur)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn statistics_split_by_currency_and_skip_transfers() {
    let engine = engine_with_db().await;
    let usd = engine
        .new_account("alice", "US Checking", Currency::Usd, 0)
        .await
        .unwrap();
    let usd_savings = engine
        .new_account("alice", "US Savings", Currency::Usd, 0)
        .await
        .unwrap();
    let eur = engine
        .new_account("alice", "EU Checking", Currency::Eur, 0)
        .await
        .unwrap();

    engine
        .income("alice", usd, 10_000, None, None, Utc::now())
        .await
        .unwrap();
    engine
        .expense("alice", usd, 2_500, None, None, Utc::now())
        .await
        .unwrap();
    engine
        .income("alice", eur, 4_000, None, None, Utc::now())
        .await
        .unwrap();
    // Transfers move balances but are not income/expense.
    engine
        .transfer("alice", usd, usd_savings, 1_000, None, Utc::now())
        .await
        .unwrap();

    let totals = engine.statistics("alice").await.unwrap();
    assert_eq!(totals.len(), 2);

    let eur_row = totals
        .iter()
        .find(|t| t.currency == Currency::Eur)
        .unwrap();
    assert_eq!(eur_row.balance_minor, 4_000);
    assert_eq!(eur_row.total_income_minor, 4_000);
    assert_eq!(eur_row.total_expenses_minor, 0);

    let usd_row = totals
        .iter()
        .find(|t| t.currency == Currency::Usd)
        .unwrap();
    assert_eq!(usd_row.balance_minor, 7_500);
    assert_eq!(usd_row.total_income_minor, 10_000);
    assert_eq!(usd_row.total_expenses_minor, 2_500);
}

#[tokio::test]
async fn goal_lifecycle() {
    let engine = engine_with_db().await;
    let goal_id = engine
        .new_goal("alice", "House deposit", 5_000_000, Currency::Eur, None)
        .await
        .unwrap();

    engine
        .update_goal(
            "alice",
            goal_id,
            GoalPatch {
                saved_minor: Some(120_000),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let goals = engine.list_goals("alice").await.unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].saved_minor, 120_000);
    assert_eq!(goals[0].target_minor, 5_000_000);

    engine
        .update_goal(
            "alice",
            goal_id,
            GoalPatch {
                archived: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(engine.list_goals("alice").await.unwrap()[0].archived);
}
