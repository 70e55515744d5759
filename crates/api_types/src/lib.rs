use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Currency codes supported across the API.
///
/// This is the closed set offered by the client's currency selector; the
/// engine carries its own copy of the enum and the server maps between the
/// two at the boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Mxn,
    Cad,
    Aud,
    Jpy,
    Chf,
    Brl,
    Cop,
}

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        pub currency: Currency,
        /// Opening balance in minor units (may be negative).
        pub opening_minor: i64,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: Uuid,
        pub name: String,
        pub currency: Currency,
        pub balance_minor: i64,
        pub archived: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountsResponse {
        pub accounts: Vec<AccountView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountUpdate {
        pub name: Option<String>,
        pub archived: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountCreated {
        pub id: Uuid,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub archived: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoriesResponse {
        pub categories: Vec<CategoryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        pub archived: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryCreated {
        pub id: Uuid,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
        Transfer,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionList {
        pub account_id: Uuid,
        pub limit: Option<u64>,
        pub include_voided: Option<bool>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub kind: TransactionKind,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub occurred_at: DateTime<FixedOffset>,
        /// Signed amount for the requested account, in minor units.
        pub amount_minor: i64,
        pub currency: Currency,
        pub category_id: Option<Uuid>,
        pub note: Option<String>,
        pub voided: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeNew {
        pub account_id: Uuid,
        /// Must be > 0, in minor units of the account currency.
        pub amount_minor: i64,
        pub category_id: Option<Uuid>,
        pub note: Option<String>,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub occurred_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub account_id: Uuid,
        /// Must be > 0, in minor units of the account currency.
        pub amount_minor: i64,
        pub category_id: Option<Uuid>,
        pub note: Option<String>,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub occurred_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferNew {
        pub from_account_id: Uuid,
        pub to_account_id: Uuid,
        /// Must be > 0. Both accounts must share one currency.
        pub amount_minor: i64,
        pub note: Option<String>,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub occurred_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub amount_minor: i64,
        pub category_id: Option<Uuid>,
        pub note: Option<String>,
        pub occurred_at: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionVoid {
        /// Optional: if absent, server uses now().
        pub voided_at: Option<DateTime<FixedOffset>>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub category_id: Uuid,
        /// Budget month as `YYYY-MM`.
        pub month: String,
        pub limit_minor: i64,
        pub currency: Currency,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub category_id: Uuid,
        pub month: String,
        pub limit_minor: i64,
        /// Non-voided expense total for the category/month/currency.
        pub spent_minor: i64,
        pub currency: Currency,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetList {
        /// Budget month as `YYYY-MM`.
        pub month: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetsResponse {
        pub budgets: Vec<BudgetView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        pub limit_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetCreated {
        pub id: Uuid,
    }
}

pub mod goal {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalNew {
        pub name: String,
        pub target_minor: i64,
        pub currency: Currency,
        pub target_date: Option<NaiveDate>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct GoalView {
        pub id: Uuid,
        pub name: String,
        pub target_minor: i64,
        pub saved_minor: i64,
        pub currency: Currency,
        pub target_date: Option<NaiveDate>,
        pub archived: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalsResponse {
        pub goals: Vec<GoalView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalUpdate {
        pub name: Option<String>,
        pub target_minor: Option<i64>,
        pub saved_minor: Option<i64>,
        pub target_date: Option<NaiveDate>,
        pub archived: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalCreated {
        pub id: Uuid,
    }
}

pub mod stats {
    use super::*;

    /// Totals for one currency across the user's active accounts.
    ///
    /// The server never aggregates across currencies; clients convert to the
    /// preferred display currency themselves.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CurrencyTotal {
        pub currency: Currency,
        pub balance_minor: i64,
        pub total_income_minor: i64,
        pub total_expenses_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatsResponse {
        pub totals: Vec<CurrencyTotal>,
    }
}

pub mod rates {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct RateEntry {
        pub currency: Currency,
        /// Rate relative to `base` (base itself is 1.0).
        pub rate: f64,
    }

    /// Snapshot of the server's current rate table.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct RateTableView {
        pub base: Currency,
        pub rates: Vec<RateEntry>,
        pub fetched_at: DateTime<Utc>,
    }
}
