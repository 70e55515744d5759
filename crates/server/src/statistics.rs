//! Statistics API endpoints

use api_types::stats::{CurrencyTotal, StatsResponse};
use axum::{Extension, Json, extract::State};
use engine::users;

use crate::{ServerError, map_currency, server::ServerState};

/// Handle requests for user statistics.
///
/// Returns one row per currency; the client aggregates into its preferred
/// display currency.
pub async fn get_stats(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<StatsResponse>, ServerError> {
    let totals = state.engine.statistics(&user.username).await?;

    Ok(Json(StatsResponse {
        totals: totals
            .into_iter()
            .map(|row| CurrencyTotal {
                currency: map_currency(row.currency),
                balance_minor: row.balance_minor,
                total_income_minor: row.total_income_minor,
                total_expenses_minor: row.total_expenses_minor,
            })
            .collect(),
    }))
}
