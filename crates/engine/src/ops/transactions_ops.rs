use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, Condition, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{Currency, EngineError, ResultEngine, Transaction, TransactionKind, transactions};

use super::{Engine, normalize_optional_text, with_tx};

impl Engine {
    /// Create an income transaction (increases the account balance).
    #[allow(clippy::too_many_arguments)]
    pub async fn income(
        &self,
        user_id: &str,
        account_id: Uuid,
        amount_minor: i64,
        category_id: Option<Uuid>,
        note: Option<&str>,
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        self.create_entry(
            TransactionKind::Income,
            user_id,
            account_id,
            amount_minor,
            category_id,
            note,
            occurred_at,
        )
        .await
    }

    /// Create an expense transaction (decreases the account balance).
    #[allow(clippy::too_many_arguments)]
    pub async fn expense(
        &self,
        user_id: &str,
        account_id: Uuid,
        amount_minor: i64,
        category_id: Option<Uuid>,
        note: Option<&str>,
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        self.create_entry(
            TransactionKind::Expense,
            user_id,
            account_id,
            amount_minor,
            category_id,
            note,
            occurred_at,
        )
        .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn create_entry(
        &self,
        kind: TransactionKind,
        user_id: &str,
        account_id: Uuid,
        amount_minor: i64,
        category_id: Option<Uuid>,
        note: Option<&str>,
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        let note = normalize_optional_text(note);
        with_tx!(self, |db_tx| {
            let account = self.account_model(&db_tx, user_id, account_id).await?;
            let currency = Currency::try_from(account.currency.as_str())?;

            if let Some(category_id) = category_id {
                self.category_model(&db_tx, user_id, category_id).await?;
            }

            let tx = Transaction::new(
                kind,
                account_id,
                None,
                amount_minor,
                currency,
                category_id,
                note,
                occurred_at,
            )?;
            let tx_id = tx.id;
            let mut model: transactions::ActiveModel = (&tx).into();
            model.user_id = ActiveValue::Set(user_id.to_string());
            model.insert(&db_tx).await?;

            let delta = match kind {
                TransactionKind::Income => amount_minor,
                TransactionKind::Expense => -amount_minor,
                TransactionKind::Transfer => {
                    return Err(EngineError::InvalidAmount(
                        "transfers have their own entry point".to_string(),
                    ));
                }
            };
            self.apply_balance_delta(&db_tx, user_id, account_id, delta)
                .await?;

            Ok(tx_id)
        })
    }

    /// Move money between two accounts of the same currency.
    pub async fn transfer(
        &self,
        user_id: &str,
        from_account_id: Uuid,
        to_account_id: Uuid,
        amount_minor: i64,
        note: Option<&str>,
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        if from_account_id == to_account_id {
            return Err(EngineError::InvalidAmount(
                "from_account_id and to_account_id must differ".to_string(),
            ));
        }
        let note = normalize_optional_text(note);
        with_tx!(self, |db_tx| {
            let from = self.account_model(&db_tx, user_id, from_account_id).await?;
            let to = self.account_model(&db_tx, user_id, to_account_id).await?;
            if from.currency != to.currency {
                return Err(EngineError::CurrencyMismatch(format!(
                    "cannot transfer {} into {}",
                    from.currency, to.currency
                )));
            }
            let currency = Currency::try_from(from.currency.as_str())?;

            let tx = Transaction::new(
                TransactionKind::Transfer,
                from_account_id,
                Some(to_account_id),
                amount_minor,
                currency,
                None,
                note,
                occurred_at,
            )?;
            let tx_id = tx.id;
            let mut model: transactions::ActiveModel = (&tx).into();
            model.user_id = ActiveValue::Set(user_id.to_string());
            model.insert(&db_tx).await?;

            self.apply_balance_delta(&db_tx, user_id, from_account_id, -amount_minor)
                .await?;
            self.apply_balance_delta(&db_tx, user_id, to_account_id, amount_minor)
                .await?;

            Ok(tx_id)
        })
    }

    /// Lists recent transactions that affect a given account, newest first.
    ///
    /// Returns `(transaction, signed_amount_minor)` where `signed_amount_minor`
    /// is the balance effect on that account (transfers in are positive,
    /// everything leaving is negative).
    pub async fn list_transactions(
        &self,
        user_id: &str,
        account_id: Uuid,
        limit: u64,
        include_voided: bool,
    ) -> ResultEngine<Vec<(Transaction, i64)>> {
        // Ownership check up front so a foreign account 404s instead of
        // returning an empty list.
        self.account_model(&self.database, user_id, account_id)
            .await?;

        let mut query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(
                Condition::any()
                    .add(transactions::Column::AccountId.eq(account_id.to_string()))
                    .add(transactions::Column::CounterAccountId.eq(account_id.to_string())),
            )
            .order_by_desc(transactions::Column::OccurredAt)
            .limit(limit);

        if !include_voided {
            query = query.filter(transactions::Column::VoidedAt.is_null());
        }

        let models = query.all(&self.database).await?;

        let mut out = Vec::with_capacity(models.len());
        for model in models {
            let tx = Transaction::try_from(model)?;
            let signed = match tx.kind {
                TransactionKind::Income => tx.amount_minor,
                TransactionKind::Expense => -tx.amount_minor,
                TransactionKind::Transfer if tx.account_id == account_id => -tx.amount_minor,
                TransactionKind::Transfer => tx.amount_minor,
            };
            out.push((tx, signed));
        }
        Ok(out)
    }

    /// Voids a transaction (soft delete).
    ///
    /// This:
    /// - sets `voided_at`/`voided_by` on the transaction row
    /// - reverts its effects on account balances
    ///
    /// Voided transactions are hidden by default in lists.
    pub async fn void_transaction(
        &self,
        user_id: &str,
        transaction_id: Uuid,
        voided_at: DateTime<Utc>,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .transaction_model(&db_tx, user_id, transaction_id)
                .await?;
            if model.voided_at.is_some() {
                return Err(EngineError::InvalidAmount(
                    "transaction already voided".to_string(),
                ));
            }
            let tx = Transaction::try_from(model)?;

            match tx.kind {
                TransactionKind::Income => {
                    self.apply_balance_delta(&db_tx, user_id, tx.account_id, -tx.amount_minor)
                        .await?;
                }
                TransactionKind::Expense => {
                    self.apply_balance_delta(&db_tx, user_id, tx.account_id, tx.amount_minor)
                        .await?;
                }
                TransactionKind::Transfer => {
                    self.apply_balance_delta(&db_tx, user_id, tx.account_id, tx.amount_minor)
                        .await?;
                    if let Some(counter_id) = tx.counter_account_id {
                        self.apply_balance_delta(&db_tx, user_id, counter_id, -tx.amount_minor)
                            .await?;
                    }
                }
            }

            let tx_active = transactions::ActiveModel {
                id: ActiveValue::Set(transaction_id.to_string()),
                voided_at: ActiveValue::Set(Some(voided_at)),
                voided_by: ActiveValue::Set(Some(user_id.to_string())),
                ..Default::default()
            };
            tx_active.update(&db_tx).await?;

            Ok(())
        })
    }

    /// Updates the amount/metadata of an existing transaction.
    ///
    /// Targets (accounts) and kind are kept unchanged; balances are adjusted
    /// by the amount delta.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: Uuid,
        amount_minor: i64,
        category_id: Option<Uuid>,
        note: Option<&str>,
        occurred_at: Option<DateTime<Utc>>,
    ) -> ResultEngine<()> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        let note = normalize_optional_text(note);
        with_tx!(self, |db_tx| {
            let model = self
                .transaction_model(&db_tx, user_id, transaction_id)
                .await?;
            if model.voided_at.is_some() {
                return Err(EngineError::InvalidAmount(
                    "cannot update a voided transaction".to_string(),
                ));
            }
            let tx = Transaction::try_from(model.clone())?;

            if let Some(category_id) = category_id {
                self.category_model(&db_tx, user_id, category_id).await?;
            }

            let delta = amount_minor - tx.amount_minor;
            match tx.kind {
                TransactionKind::Income => {
                    self.apply_balance_delta(&db_tx, user_id, tx.account_id, delta)
                        .await?;
                }
                TransactionKind::Expense => {
                    self.apply_balance_delta(&db_tx, user_id, tx.account_id, -delta)
                        .await?;
                }
                TransactionKind::Transfer => {
                    self.apply_balance_delta(&db_tx, user_id, tx.account_id, -delta)
                        .await?;
                    if let Some(counter_id) = tx.counter_account_id {
                        self.apply_balance_delta(&db_tx, user_id, counter_id, delta)
                            .await?;
                    }
                }
            }

            let tx_active = transactions::ActiveModel {
                id: ActiveValue::Set(transaction_id.to_string()),
                amount_minor: ActiveValue::Set(amount_minor),
                category_id: ActiveValue::Set(category_id.map(|id| id.to_string())),
                note: ActiveValue::Set(note),
                occurred_at: ActiveValue::Set(occurred_at.unwrap_or(model.occurred_at)),
                ..Default::default()
            };
            tx_active.update(&db_tx).await?;

            Ok(())
        })
    }
}
