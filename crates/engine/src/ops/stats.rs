use std::collections::BTreeMap;

use sea_orm::{QueryFilter, prelude::*};

use crate::{Currency, ResultEngine, TransactionKind, accounts, transactions};

use super::Engine;

/// Per-currency totals over a user's active accounts.
///
/// The engine never sums across currencies; converting the rows into one
/// display currency is the client's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyTotals {
    pub currency: Currency,
    pub balance_minor: i64,
    pub total_income_minor: i64,
    pub total_expenses_minor: i64,
}

fn totals_entry<'a>(
    map: &'a mut BTreeMap<&'static str, CurrencyTotals>,
    currency: Currency,
) -> &'a mut CurrencyTotals {
    map.entry(currency.code()).or_insert(CurrencyTotals {
        currency,
        balance_minor: 0,
        total_income_minor: 0,
        total_expenses_minor: 0,
    })
}

impl Engine {
    /// Returns one row per currency the user holds, ordered by currency code.
    ///
    /// Transfers are excluded from income/expense totals, voided transactions
    /// and archived accounts are ignored.
    pub async fn statistics(&self, user_id: &str) -> ResultEngine<Vec<CurrencyTotals>> {
        let mut per_currency: BTreeMap<&'static str, CurrencyTotals> = BTreeMap::new();

        let account_models = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .filter(accounts::Column::Archived.eq(false))
            .all(&self.database)
            .await?;

        for model in account_models {
            let currency = Currency::try_from(model.currency.as_str())?;
            totals_entry(&mut per_currency, currency).balance_minor += model.balance_minor;
        }

        let tx_models = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::VoidedAt.is_null())
            .filter(transactions::Column::Kind.is_not_in([TransactionKind::Transfer.as_str()]))
            .all(&self.database)
            .await?;

        for model in tx_models {
            let currency = Currency::try_from(model.currency.as_str())?;
            let totals = totals_entry(&mut per_currency, currency);
            match TransactionKind::try_from(model.kind.as_str())? {
                TransactionKind::Income => totals.total_income_minor += model.amount_minor,
                TransactionKind::Expense => totals.total_expenses_minor += model.amount_minor,
                TransactionKind::Transfer => {}
            }
        }

        Ok(per_currency.into_values().collect())
    }
}
