pub use accounts::Account;
pub use budgets::Budget;
pub use categories::Category;
pub use currency::Currency;
pub use error::EngineError;
pub use goals::Goal;
pub use money::Money;
pub use ops::{CurrencyTotals, Engine, EngineBuilder, GoalPatch};
pub use rates::{ConversionError, RateTable};
pub use transactions::{Transaction, TransactionKind};

mod accounts;
mod budgets;
mod categories;
mod currency;
mod error;
mod goals;
mod money;
mod ops;
mod rates;
mod transactions;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;
