//! Exchange-rate API endpoint

use api_types::rates::{RateEntry, RateTableView};
use axum::{Json, extract::State};
use engine::RateTable;

use crate::{ServerError, map_currency, server::ServerState};

fn rate_table_view(table: &RateTable) -> RateTableView {
    let mut rates: Vec<RateEntry> = table
        .entries()
        .map(|(currency, rate)| RateEntry {
            currency: map_currency(currency),
            rate,
        })
        .collect();
    rates.sort_by_key(|entry| entry.currency);

    RateTableView {
        base: map_currency(table.base()),
        rates,
        fetched_at: table.fetched_at(),
    }
}

/// Serves the latest rate snapshot.
///
/// 404 until the first refresh lands; clients treat that as "rates not
/// loaded" and keep showing original-currency amounts.
pub async fn get(State(state): State<ServerState>) -> Result<Json<RateTableView>, ServerError> {
    let rates = state.rates.read().await;
    match rates.as_ref() {
        Some(table) => Ok(Json(rate_table_view(table))),
        None => Err(ServerError::NotFound("rates not available yet".to_string())),
    }
}
