//! Investment / savings goals.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{Currency, EngineError};

/// A savings target tracked in a single currency.
#[derive(Clone, Debug, Serialize)]
pub struct Goal {
    pub id: Uuid,
    pub name: String,
    pub target_minor: i64,
    pub saved_minor: i64,
    pub currency: Currency,
    pub target_date: Option<NaiveDate>,
    pub archived: bool,
}

impl Goal {
    pub fn new(
        name: String,
        target_minor: i64,
        currency: Currency,
        target_date: Option<NaiveDate>,
    ) -> Result<Self, EngineError> {
        if target_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "target_minor must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            target_minor,
            saved_minor: 0,
            currency,
            target_date,
            archived: false,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub target_minor: i64,
    pub saved_minor: i64,
    pub currency: String,
    pub target_date: Option<NaiveDate>,
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

impl From<&Goal> for ActiveModel {
    fn from(value: &Goal) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::NotSet,
            name: ActiveValue::Set(value.name.clone()),
            target_minor: ActiveValue::Set(value.target_minor),
            saved_minor: ActiveValue::Set(value.saved_minor),
            currency: ActiveValue::Set(value.currency.code().to_string()),
            target_date: ActiveValue::Set(value.target_date),
            archived: ActiveValue::Set(value.archived),
        }
    }
}

impl TryFrom<Model> for Goal {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::InvalidAmount("invalid goal id".to_string()))?;
        Ok(Goal {
            id,
            name: model.name,
            target_minor: model.target_minor,
            saved_minor: model.saved_minor,
            currency: Currency::try_from(model.currency.as_str())?,
            target_date: model.target_date,
            archived: model.archived,
        })
    }
}
