pub mod budgets;
pub mod goals;
pub mod login;
pub mod overview;
pub mod transactions;
