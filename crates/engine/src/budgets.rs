//! Monthly category budgets.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{Currency, EngineError};

/// A spending cap for one category in one calendar month.
///
/// `month` uses the canonical `YYYY-MM` form. The pair (category, month) is
/// unique per user.
#[derive(Clone, Debug, Serialize)]
pub struct Budget {
    pub id: Uuid,
    pub category_id: Uuid,
    pub month: String,
    pub limit_minor: i64,
    pub currency: Currency,
}

impl Budget {
    pub fn new(
        category_id: Uuid,
        month: String,
        limit_minor: i64,
        currency: Currency,
    ) -> Result<Self, EngineError> {
        if limit_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "limit_minor must be > 0".to_string(),
            ));
        }
        month_bounds(&month)?;
        Ok(Self {
            id: Uuid::new_v4(),
            category_id,
            month,
            limit_minor,
            currency,
        })
    }
}

/// Parses a `YYYY-MM` month into its `[first day, first day of next month)`
/// date range.
pub fn month_bounds(month: &str) -> Result<(NaiveDate, NaiveDate), EngineError> {
    let invalid = || EngineError::InvalidAmount(format!("invalid month: {month}"));
    let start =
        NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").map_err(|_| invalid())?;
    let end = start
        .checked_add_months(chrono::Months::new(1))
        .ok_or_else(invalid)?;
    Ok((start, end))
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub month: String,
    pub limit_minor: i64,
    pub currency: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Categories,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(value: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::NotSet,
            category_id: ActiveValue::Set(value.category_id.to_string()),
            month: ActiveValue::Set(value.month.clone()),
            limit_minor: ActiveValue::Set(value.limit_minor),
            currency: ActiveValue::Set(value.currency.code().to_string()),
        }
    }
}

impl TryFrom<Model> for Budget {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let invalid_id = || EngineError::InvalidAmount("invalid budget id".to_string());
        Ok(Budget {
            id: Uuid::parse_str(&model.id).map_err(|_| invalid_id())?,
            category_id: Uuid::parse_str(&model.category_id).map_err(|_| invalid_id())?,
            month: model.month,
            limit_minor: model.limit_minor,
            currency: Currency::try_from(model.currency.as_str())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds_cover_the_calendar_month() {
        let (start, end) = month_bounds("2026-01").unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());

        let (start, end) = month_bounds("2025-12").unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn month_bounds_reject_malformed_input() {
        assert!(month_bounds("2026").is_err());
        assert!(month_bounds("2026-13").is_err());
        assert!(month_bounds("jan 2026").is_err());
    }

    #[test]
    fn budget_rejects_non_positive_limit() {
        assert!(Budget::new(Uuid::new_v4(), "2026-01".to_string(), 0, Currency::Eur).is_err());
    }
}
