use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Account, Currency, EngineError, ResultEngine, accounts};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Add a new account for a user.
    pub async fn new_account(
        &self,
        user_id: &str,
        name: &str,
        currency: Currency,
        opening_minor: i64,
    ) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "account")?;
        with_tx!(self, |db_tx| {
            let exists = accounts::Entity::find()
                .filter(accounts::Column::UserId.eq(user_id))
                .filter(accounts::Column::Name.eq(name.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            let account = Account::new(name, currency, opening_minor);
            let account_id = account.id;
            let mut model: accounts::ActiveModel = (&account).into();
            model.user_id = ActiveValue::Set(user_id.to_string());
            model.insert(&db_tx).await?;
            Ok(account_id)
        })
    }

    /// Return one account.
    pub async fn account(&self, user_id: &str, account_id: Uuid) -> ResultEngine<Account> {
        let model = self
            .account_model(&self.database, user_id, account_id)
            .await?;
        Account::try_from(model)
    }

    /// List the user's accounts, active first, then by name.
    pub async fn list_accounts(&self, user_id: &str) -> ResultEngine<Vec<Account>> {
        let models = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .order_by_asc(accounts::Column::Archived)
            .order_by_asc(accounts::Column::Name)
            .all(&self.database)
            .await?;

        models.into_iter().map(Account::try_from).collect()
    }

    /// Rename and/or (un)archive an account.
    pub async fn update_account(
        &self,
        user_id: &str,
        account_id: Uuid,
        name: Option<&str>,
        archived: Option<bool>,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let account = self.account_model(&db_tx, user_id, account_id).await?;

            let mut model = accounts::ActiveModel {
                id: ActiveValue::Set(account.id.clone()),
                ..Default::default()
            };

            if let Some(name) = name {
                let name = normalize_required_name(name, "account")?;
                let taken = accounts::Entity::find()
                    .filter(accounts::Column::UserId.eq(user_id))
                    .filter(accounts::Column::Name.eq(name.clone()))
                    .one(&db_tx)
                    .await?
                    .is_some_and(|other| other.id != account.id);
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
