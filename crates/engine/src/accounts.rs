//! The module contains the `Account` struct and its entity.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{Currency, EngineError};

/// An account.
///
/// An account is a representation of a real place money is kept: a wallet, a
/// bank account, a brokerage cash balance. Each account carries its own
/// currency; balances are integer minor units of that currency.
#[derive(Clone, Debug, Serialize)]
pub struct Account {
    /// Stable identifier, generated once and persisted, so the account can be
    /// renamed without breaking references.
    pub id: Uuid,
    pub name: String,
    pub currency: Currency,
    pub balance_minor: i64,
    pub archived: bool,
}

impl Account {
    pub fn new(name: String, currency: Currency, balance_minor: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            currency,
            balance_minor,
            archived: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub currency: String,
    pub balance_minor: i64,
    pub archived: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Username",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Account> for ActiveModel {
    fn from(value: &Account) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::NotSet,
            name: ActiveValue::Set(value.name.clone()),
            currency: ActiveValue::Set(value.currency.code().to_string()),
            balance_minor: ActiveValue::Set(value.balance_minor),
            archived: ActiveValue::Set(value.archived),
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::InvalidAmount("invalid account id".to_string()))?;
        Ok(Account {
            id,
            name: model.name,
            currency: Currency::try_from(model.currency.as_str())?,
            balance_minor: model.balance_minor,
            archived: model.archived,
        })
    }
}
