use std::collections::HashMap;

use chrono::NaiveTime;
use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Budget, Currency, EngineError, ResultEngine, TransactionKind, budgets, budgets::month_bounds,
    transactions,
};

use super::{Engine, with_tx};

impl Engine {
    /// Add a budget for one category and month.
    pub async fn new_budget(
        &self,
        user_id: &str,
        category_id: Uuid,
        month: &str,
        limit_minor: i64,
        currency: Currency,
    ) -> ResultEngine<Uuid> {
        let budget = Budget::new(category_id, month.to_string(), limit_minor, currency)?;
        with_tx!(self, |db_tx| {
            self.category_model(&db_tx, user_id, category_id).await?;

            let exists = budgets::Entity::find()
                .filter(budgets::Column::UserId.eq(user_id))
                .filter(budgets::Column::CategoryId.eq(category_id.to_string()))
                .filter(budgets::Column::Month.eq(budget.month.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(format!(
                    "budget for {month}"
                )));
            }

            let budget_id = budget.id;
            let mut model: budgets::ActiveModel = (&budget).into();
            model.user_id = ActiveValue::Set(user_id.to_string());
            model.insert(&db_tx).await?;
            Ok(budget_id)
        })
    }

    /// Lists a month's budgets with their spent totals.
    ///
    /// Returns `(budget, spent_minor)` where `spent_minor` sums the month's
    /// non-voided expenses of the budget's category and currency.
    pub async fn list_budgets(
        &self,
        user_id: &str,
        month: &str,
    ) -> ResultEngine<Vec<(Budget, i64)>> {
        let (start, end) = month_bounds(month)?;
        let start = start.and_time(NaiveTime::MIN).and_utc();
        let end = end.and_time(NaiveTime::MIN).and_utc();

        let models = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .filter(budgets::Column::Month.eq(month))
            .order_by_asc(budgets::Column::CategoryId)
            .all(&self.database)
            .await?;

        // One pass over the month's expenses covers every budget.
        let expenses = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::Kind.eq(TransactionKind::Expense.as_str()))
            .filter(transactions::Column::VoidedAt.is_null())
            .filter(transactions::Column::CategoryId.is_not_null())
            .filter(transactions::Column::OccurredAt.gte(start))
            .filter(transactions::Column::OccurredAt.lt(end))
            .all(&self.database)
            .await?;

        let mut spent: HashMap<(String, String), i64> = HashMap::new();
        for expense in expenses {
            if let Some(category_id) = expense.category_id {
                *spent.entry((category_id, expense.currency)).or_insert(0) +=
                    expense.amount_minor;
            }
        }

        let mut out = Vec::with_capacity(models.len());
        for model in models {
            let key = (model.category_id.clone(), model.currency.clone());
            let budget = Budget::try_from(model)?;
            out.push((budget, spent.get(&key).copied().unwrap_or(0)));
        }
        Ok(out)
    }

    /// Change a budget's limit.
    pub async fn update_budget(
        &self,
        user_id: &str,
        budget_id: Uuid,
        limit_minor: i64,
    ) -> ResultEngine<()> {
        if limit_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "limit_minor must be > 0".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            let model = self.budget_model(&db_tx, user_id, budget_id).await?;
            let active = budgets::ActiveModel {
                id: ActiveValue::Set(model.id),
                limit_minor: ActiveValue::Set(limit_minor),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Delete a budget.
    pub async fn delete_budget(&self, user_id: &str, budget_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.budget_model(&db_tx, user_id, budget_id).await?;
            model.delete(&db_tx).await?;
            Ok(())
        })
    }

    async fn budget_model<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        budget_id: Uuid,
    ) -> ResultEngine<budgets::Model> {
        budgets::Entity::find_by_id(budget_id.to_string())
            .one(conn)
            .await?
            .filter(|model| model.user_id == user_id)
            .ok_or_else(|| EngineError::KeyNotFound("budget not exists".to_string()))
    }
}
