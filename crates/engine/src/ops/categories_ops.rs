use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Category, EngineError, ResultEngine, categories};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Add a new spending category for a user.
    pub async fn new_category(&self, user_id: &str, name: &str) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "category")?;
        with_tx!(self, |db_tx| {
            let exists = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id))
                .filter(categories::Column::Name.eq(name.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            let category = Category::new(name);
            let category_id = category.id;
            let mut model: categories::ActiveModel = (&category).into();
            model.user_id = ActiveValue::Set(user_id.to_string());
            model.insert(&db_tx).await?;
            Ok(category_id)
        })
    }

    /// List the user's categories by name.
    pub async fn list_categories(&self, user_id: &str) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?;

        models.into_iter().map(Category::try_from).collect()
    }

    /// Rename and/or (un)archive a category.
    pub async fn update_category(
        &self,
        user_id: &str,
        category_id: Uuid,
        name: Option<&str>,
        archived: Option<bool>,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let category = self.category_model(&db_tx, user_id, category_id).await?;

            let mut model = categories::ActiveModel {
                id: ActiveValue::Set(category.id.clone()),
                ..Default::default()
            };

            if let Some(name) = name {
                let name = normalize_required_name(name, "category")?;
                let taken = categories::Entity::find()
                    .filter(categories::Column::UserId.eq(user_id))
                    .filter(categories::Column::Name.eq(name.clone()))
                    .one(&db_tx)
                    .await?
                    .is_some_and(|other| other.id != category.id);
                if taken {
                    return Err(EngineError::ExistingKey(name));
                }
                model.name = ActiveValue::Set(name);
            }
            if let Some(archived) = archived {
                model.archived = ActiveValue::Set(archived);
            }

            model.update(&db_tx).await?;
            Ok(())
        })
    }
}
