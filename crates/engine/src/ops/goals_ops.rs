use chrono::NaiveDate;
use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Currency, EngineError, Goal, ResultEngine, goals};

use super::{Engine, normalize_required_name, with_tx};

/// Partial update for a goal; `None` fields are left untouched.
#[derive(Debug, Default, Clone)]
pub struct GoalPatch {
    pub name: Option<String>,
    pub target_minor: Option<i64>,
    pub saved_minor: Option<i64>,
    pub target_date: Option<NaiveDate>,
    pub archived: Option<bool>,
}

impl Engine {
    /// Add a new savings goal.
    pub async fn new_goal(
        &self,
        user_id: &str,
        name: &str,
        target_minor: i64,
        currency: Currency,
        target_date: Option<NaiveDate>,
    ) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "goal")?;
        let goal = Goal::new(name.clone(), target_minor, currency, target_date)?;
        with_tx!(self, |db_tx| {
            let exists = goals::Entity::find()
                .filter(goals::Column::UserId.eq(user_id))
                .filter(goals::Column::Name.eq(name.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            let goal_id = goal.id;
            let mut model: goals::ActiveModel = (&goal).into();
            model.user_id = ActiveValue::Set(user_id.to_string());
            model.insert(&db_tx).await?;
            Ok(goal_id)
        })
    }

    /// List the user's goals, active first, then by name.
    pub async fn list_goals(&self, user_id: &str) -> ResultEngine<Vec<Goal>> {
        let models = goals::Entity::find()
            .filter(goals::Column::UserId.eq(user_id))
            .order_by_asc(goals::Column::Archived)
            .order_by_asc(goals::Column::Name)
            .all(&self.database)
            .await?;

        models.into_iter().map(Goal::try_from).collect()
    }

    /// Apply a partial update to a goal.
    pub async fn update_goal(
        &self,
        user_id: &str,
        goal_id: Uuid,
        patch: GoalPatch,
    ) -> ResultEngine<()> {
        if let Some(target_minor) = patch.target_minor {
            if target_minor <= 0 {
                return Err(EngineError::InvalidAmount(
                    "target_minor must be > 0".to_string(),
                ));
            }
        }
        if let Some(saved_minor) = patch.saved_minor {
            if saved_minor < 0 {
                return Err(EngineError::InvalidAmount(
                    "saved_minor must be >= 0".to_string(),
                ));
            }
        }

        with_tx!(self, |db_tx| {
            let model = self.goal_model(&db_tx, user_id, goal_id).await?;

            let mut active = goals::ActiveModel {
                id: ActiveValue::Set(model.id),
                ..Default::default()
            };
            if let Some(name) = patch.name {
                active.name = ActiveValue::Set(normalize_required_name(&name, "goal")?);
            }
            if let Some(target_minor) = patch.target_minor {
                active.target_minor = ActiveValue::Set(target_minor);
            }
            if let Some(saved_minor) = patch.saved_minor {
                active.saved_minor = ActiveValue::Set(saved_minor);
            }
            if let Some(target_date) = patch.target_date {
                active.target_date = ActiveValue::Set(Some(target_date));
            }
            if let Some(archived) = patch.archived {
                active.archived = ActiveValue::Set(archived);
            }

            active.update(&db_tx).await?;
            Ok(())
        })
    }

    async fn goal_model<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        goal_id: Uuid,
    ) -> ResultEngine<goals::Model> {
        goals::Entity::find_by_id(goal_id.to_string())
            .one(conn)
            .await?
            .filter(|model| model.user_id == user_id)
            .ok_or_else(|| EngineError::KeyNotFound("goal not exists".to_string()))
    }
}
