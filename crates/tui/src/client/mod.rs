//! HTTP client for the Gruzzolo API with an entity-keyed response cache.
//!
//! Queries consult the cache first; every mutation invalidates the entity
//! kinds it touches, so the next query refetches. The cache knows nothing
//! about currency display.

use std::collections::HashMap;

use api_types::{
    account::{AccountView, AccountsResponse},
    budget::{BudgetList, BudgetView, BudgetsResponse},
    category::{CategoriesResponse, CategoryView},
    goal::{GoalView, GoalsResponse},
    rates::RateTableView,
    stats::{CurrencyTotal, StatsResponse},
    transaction::{
        ExpenseNew, IncomeNew, TransactionCreated, TransactionList, TransactionListResponse,
        TransactionView,
    },
};
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::{AppError, Result};

#[derive(Debug)]
pub enum ClientError {
    Unauthorized,
    NotFound,
    Conflict(String),
    Validation(String),
    Server(String),
    Transport(reqwest::Error),
}

impl ClientError {
    /// Short user-facing message for status lines.
    pub fn message(&self) -> String {
        match self {
            ClientError::Unauthorized => "invalid credentials".to_string(),
            ClientError::NotFound => "not found".to_string(),
            ClientError::Conflict(msg)
            | ClientError::Validation(msg)
            | ClientError::Server(msg) => msg.clone(),
            ClientError::Transport(err) => format!("connection error: {err}"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Cacheable entity families, mirrored by the cache slots below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Accounts,
    Categories,
    Transactions,
    Budgets,
    Goals,
    Stats,
}

#[derive(Debug, Default)]
struct Cache {
    accounts: Option<Vec<AccountView>>,
    categories: Option<Vec<CategoryView>>,
    /// Keyed by account id.
    transactions: HashMap<Uuid, Vec<TransactionView>>,
    /// Keyed by `YYYY-MM` month.
    budgets: HashMap<String, Vec<BudgetView>>,
    goals: Option<Vec<GoalView>>,
    stats: Option<Vec<CurrencyTotal>>,
}

impl Cache {
    fn invalidate(&mut self, kind: EntityKind) {
        match kind {
            EntityKind::Accounts => self.accounts = None,
            EntityKind::Categories => self.categories = None,
            EntityKind::Transactions => self.transactions.clear(),
            EntityKind::Budgets => self.budgets.clear(),
            EntityKind::Goals => self.goals = None,
            EntityKind::Stats => self.stats = None,
        }
    }

    fn clear(&mut self) {
        for kind in [
            EntityKind::Accounts,
            EntityKind::Categories,
            EntityKind::Transactions,
            EntityKind::Budgets,
            EntityKind::Goals,
            EntityKind::Stats,
        ] {
            self.invalidate(kind);
        }
    }
}

#[derive(Debug)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    cache: Cache,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| AppError::Terminal(format!("invalid base_url: {err}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            cache: Cache::default(),
        })
    }

    /// Drops every cached response; the next queries refetch.
    pub fn invalidate_all(&mut self) {
        self.cache.clear();
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        username: &str,
        password: &str,
        body: Option<&impl serde::Serialize>,
    ) -> std::result::Result<T, ClientError> {
        let endpoint = self
            .base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))?;

        let mut request = self
            .http
            .request(method, endpoint)
            .basic_auth(username, Some(password));
        if let Some(body) = body {
            request = request.json(body);
        }

        let res = request.send().await.map_err(ClientError::Transport)?;

        if res.status().is_success() {
            if res.status() == StatusCode::NO_CONTENT {
                // 204 carries no body; decode the unit-ish types from null.
                return serde_json::from_value(serde_json::Value::Null)
                    .map_err(|err| ClientError::Server(err.to_string()));
            }
            return res.json::<T>().await.map_err(ClientError::Transport);
        }

        let status = res.status();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());

        let err = match status.as_u16() {
            401 => ClientError::Unauthorized,
            404 => ClientError::NotFound,
            409 => ClientError::Conflict(body),
            422 => ClientError::Validation(body),
            _ => ClientError::Server(body),
        };
        Err(err)
    }

    pub async fn accounts(
        &mut self,
        username: &str,
        password: &str,
    ) -> std::result::Result<Vec<AccountView>, ClientError> {
        if let Some(accounts) = &self.cache.accounts {
            return Ok(accounts.clone());
        }
        let response: AccountsResponse = self
            .send(Method::GET, "accounts", username, password, None::<&()>)
            .await?;
        self.cache.accounts = Some(response.accounts.clone());
        Ok(response.accounts)
    }

    pub async fn categories(
        &mut self,
        username: &str,
        password: &str,
    ) -> std::result::Result<Vec<CategoryView>, ClientError> {
        if let Some(categories) = &self.cache.categories {
            return Ok(categories.clone());
        }
        let response: CategoriesResponse = self
            .send(Method::GET, "categories", username, password, None::<&()>)
            .await?;
        self.cache.categories = Some(response.categories.clone());
        Ok(response.categories)
    }

    pub async fn transactions(
        &mut self,
        username: &str,
        password: &str,
        account_id: Uuid,
    ) -> std::result::Result<Vec<TransactionView>, ClientError> {
        if let Some(transactions) = self.cache.transactions.get(&account_id) {
            return Ok(transactions.clone());
        }
        let payload = TransactionList {
            account_id,
            limit: Some(100),
            include_voided: Some(false),
        };
        let response: TransactionListResponse = self
            .send(
                Method::GET,
                "transactions",
                username,
                password,
                Some(&payload),
            )
            .await?;
        self.cache
            .transactions
            .insert(account_id, response.transactions.clone());
        Ok(response.transactions)
    }

    pub async fn income_new(
        &mut self,
        username: &str,
        password: &str,
        payload: &IncomeNew,
    ) -> std::result::Result<Uuid, ClientError> {
        let created: TransactionCreated = self
            .send(Method::POST, "income", username, password, Some(payload))
            .await?;
        self.invalidate_after_ledger_change();
        Ok(created.id)
    }

    pub async fn expense_new(
        &mut self,
        username: &str,
        password: &str,
        payload: &ExpenseNew,
    ) -> std::result::Result<Uuid, ClientError> {
        let created: TransactionCreated = self
            .send(Method::POST, "expense", username, password, Some(payload))
            .await?;
        self.invalidate_after_ledger_change();
        Ok(created.id)
    }

    pub async fn budgets(
        &mut self,
        username: &str,
        password: &str,
        month: &str,
    ) -> std::result::Result<Vec<BudgetView>, ClientError> {
        if let Some(budgets) = self.cache.budgets.get(month) {
            return Ok(budgets.clone());
        }
        let payload = BudgetList {
            month: month.to_string(),
        };
        let response: BudgetsResponse = self
            .send(Method::GET, "budgets", username, password, Some(&payload))
            .await?;
        self.cache
            .budgets
            .insert(month.to_string(), response.budgets.clone());
        Ok(response.budgets)
    }

    pub async fn goals(
        &mut self,
        username: &str,
        password: &str,
    ) -> std::result::Result<Vec<GoalView>, ClientError> {
        if let Some(goals) = &self.cache.goals {
            return Ok(goals.clone());
        }
        let response: GoalsResponse = self
            .send(Method::GET, "goals", username, password, None::<&()>)
            .await?;
        self.cache.goals = Some(response.goals.clone());
        Ok(response.goals)
    }

    pub async fn stats(
        &mut self,
        username: &str,
        password: &str,
    ) -> std::result::Result<Vec<CurrencyTotal>, ClientError> {
        if let Some(stats) = &self.cache.stats {
            return Ok(stats.clone());
        }
        let response: StatsResponse = self
            .send(Method::GET, "stats", username, password, None::<&()>)
            .await?;
        self.cache.stats = Some(response.totals.clone());
        Ok(response.totals)
    }

    /// Fetches the server's rate snapshot; `Ok(None)` means no snapshot has
    /// landed there yet.
    pub async fn rates(
        &self,
        username: &str,
        password: &str,
    ) -> std::result::Result<Option<RateTableView>, ClientError> {
        match self
            .send::<RateTableView>(Method::GET, "rates", username, password, None::<&()>)
            .await
        {
            Ok(view) => Ok(Some(view)),
            Err(ClientError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn invalidate_after_ledger_change(&mut self) {
        self.cache.invalidate(EntityKind::Transactions);
        self.cache.invalidate(EntityKind::Accounts);
        self.cache.invalidate(EntityKind::Stats);
        self.cache.invalidate(EntityKind::Budgets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidate_clears_only_the_requested_slot() {
        let mut cache = Cache::default();
        cache.accounts = Some(Vec::new());
        cache.goals = Some(Vec::new());
        cache.transactions.insert(Uuid::new_v4(), Vec::new());

        cache.invalidate(EntityKind::Accounts);
        assert!(cache.accounts.is_none());
        assert!(cache.goals.is_some());
        assert_eq!(cache.transactions.len(), 1);

        cache.invalidate(EntityKind::Transactions);
        assert!(cache.transactions.is_empty());
    }

    #[test]
    fn clear_empties_every_slot() {
        let mut cache = Cache::default();
        cache.accounts = Some(Vec::new());
        cache.stats = Some(Vec::new());
        cache.budgets.insert("2026-01".to_string(), Vec::new());

        cache.clear();
        assert!(cache.accounts.is_none());
        assert!(cache.stats.is_none());
        assert!(cache.budgets.is_empty());
    }
}
