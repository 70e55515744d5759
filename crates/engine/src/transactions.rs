//! Transactions: the ledger's immutable money movements.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{Currency, EngineError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

impl TransactionKind {
    /// Canonical string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
            TransactionKind::Transfer => "transfer",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            "transfer" => Ok(TransactionKind::Transfer),
            other => Err(EngineError::InvalidAmount(format!(
                "unknown transaction kind: {other}"
            ))),
        }
    }
}

/// A money movement against one account (two for transfers).
///
/// `amount_minor` is always positive; the kind defines the direction.
/// `currency` always equals the account's currency. Voided transactions keep
/// their row but no longer affect balances.
#[derive(Clone, Debug, Serialize)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub account_id: Uuid,
    /// Receiving account for transfers, `None` otherwise.
    pub counter_account_id: Option<Uuid>,
    pub amount_minor: i64,
    pub currency: Currency,
    pub category_id: Option<Uuid>,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub voided_at: Option<DateTime<Utc>>,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: TransactionKind,
        account_id: Uuid,
        counter_account_id: Option<Uuid>,
        amount_minor: i64,
        currency: Currency,
        category_id: Option<Uuid>,
        note: Option<String>,
        occurred_at: DateTime<Utc>,
    ) -> Result<Self, EngineError> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        if (kind == TransactionKind::Transfer) != counter_account_id.is_some() {
            return Err(EngineError::InvalidAmount(
                "counter account is for transfers only".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            account_id,
            counter_account_id,
            amount_minor,
            currency,
            category_id,
            note,
            occurred_at,
            voided_at: None,
        })
    }

    /// Signed balance effect on a given account, in minor units.
    ///
    /// Zero when the transaction is voided or does not touch the account.
    #[must_use]
    pub fn signed_amount_for(&self, account_id: Uuid) -> i64 {
        if self.voided_at.is_some() {
            return 0;
        }
        match self.kind {
            TransactionKind::Income if self.account_id == account_id => self.amount_minor,
            TransactionKind::Expense if self.account_id == account_id => -self.amount_minor,
            TransactionKind::Transfer if self.account_id == account_id => -self.amount_minor,
            TransactionKind::Transfer if self.counter_account_id == Some(account_id) => {
                self.amount_minor
            }
            _ => 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub account_id: String,
    pub counter_account_id: Option<String>,
    pub kind: String,
    pub amount_minor: i64,
    pub currency: String,
    pub category_id: Option<String>,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub voided_at: Option<DateTime<Utc>>,
    pub voided_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(value: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::NotSet,
            account_id: ActiveValue::Set(value.account_id.to_string()),
            counter_account_id: ActiveValue::Set(
                value.counter_account_id.map(|id| id.to_string()),
            ),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(value.amount_minor),
            currency: ActiveValue::Set(value.currency.code().to_string()),
            category_id: ActiveValue::Set(value.category_id.map(|id| id.to_string())),
            note: ActiveValue::Set(value.note.clone()),
            occurred_at: ActiveValue::Set(value.occurred_at),
            voided_at: ActiveValue::Set(value.voided_at),
            voided_by: ActiveValue::NotSet,
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let invalid_id = || EngineError::InvalidAmount("invalid transaction id".to_string());
        let id = Uuid::parse_str(&model.id).map_err(|_| invalid_id())?;
        let account_id = Uuid::parse_str(&model.account_id).map_err(|_| invalid_id())?;
        let counter_account_id = match model.counter_account_id {
            Some(raw) => Some(Uuid::parse_str(&raw).map_err(|_| invalid_id())?),
            None => None,
        };
        let category_id = match model.category_id {
            Some(raw) => Some(Uuid::parse_str(&raw).map_err(|_| invalid_id())?),
            None => None,
        };

        Ok(Transaction {
            id,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            account_id,
            counter_account_id,
            amount_minor: model.amount_minor,
            currency: Currency::try_from(model.currency.as_str())?,
            category_id,
            note: model.note,
            occurred_at: model.occurred_at,
            voided_at: model.voided_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_amounts() {
        let res = Transaction::new(
            TransactionKind::Income,
            Uuid::new_v4(),
            None,
            0,
            Currency::Eur,
            None,
            None,
            Utc::now(),
        );
        assert!(res.is_err());
    }

    #[test]
    fn transfer_requires_counter_account() {
        let res = Transaction::new(
            TransactionKind::Transfer,
            Uuid::new_v4(),
            None,
            100,
            Currency::Eur,
            None,
            None,
            Utc::now(),
        );
        assert!(res.is_err());
    }

    #[test]
    fn signed_amount_follows_kind_and_side() {
        let from = Uuid::new_v4();
        let to = Uuid::new_v4();
        let tx = Transaction::new(
            TransactionKind::Transfer,
            from,
            Some(to),
            250,
            Currency::Usd,
            None,
            None,
            Utc::now(),
        )
        .unwrap();

        assert_eq!(tx.signed_amount_for(from), -250);
        assert_eq!(tx.signed_amount_for(to), 250);
        assert_eq!(tx.signed_amount_for(Uuid::new_v4()), 0);
    }
}
