use sea_orm::{ActiveValue, ConnectionTrait, DatabaseConnection, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, accounts, categories, transactions};

mod accounts_ops;
mod budgets_ops;
mod categories_ops;
mod goals_ops;
mod stats;
mod transactions_ops;

pub use goals_ops::GoalPatch;
pub use stats::CurrencyTotals;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Loads an account row, enforcing ownership.
    ///
    /// Rows belonging to another user surface as not-found.
    pub(crate) async fn account_model<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        account_id: Uuid,
    ) -> ResultEngine<accounts::Model> {
        accounts::Entity::find_by_id(account_id.to_string())
            .one(conn)
            .await?
            .filter(|model| model.user_id == user_id)
            .ok_or_else(|| EngineError::KeyNotFound("account not exists".to_string()))
    }

    pub(crate) async fn category_model<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        category_id: Uuid,
    ) -> ResultEngine<categories::Model> {
        categories::Entity::find_by_id(category_id.to_string())
            .one(conn)
            .await?
            .filter(|model| model.user_id == user_id)
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))
    }

    pub(crate) async fn transaction_model<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        transaction_id: Uuid,
    ) -> ResultEngine<transactions::Model> {
        transactions::Entity::find_by_id(transaction_id.to_string())
            .one(conn)
            .await?
            .filter(|model| model.user_id == user_id)
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))
    }

    /// Applies a signed balance change to an account row.
    pub(crate) async fn apply_balance_delta<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        account_id: Uuid,
        delta_minor: i64,
    ) -> ResultEngine<()> {
        let account = self.account_model(conn, user_id, account_id).await?;
        let model = accounts::ActiveModel {
            id: ActiveValue::Set(account.id),
            balance_minor: ActiveValue::Set(account.balance_minor + delta_minor),
            ..Default::default()
        };
        model.update(conn).await?;
        Ok(())
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
