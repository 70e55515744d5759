use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use rate_feed::{HttpRateSource, RateFeedError, RateSource, spawn_refresh};
pub use server::{ServerState, run_with_listener, spawn_with_listener};

mod accounts;
mod budgets;
mod categories;
mod goals;
mod rate_feed;
mod rates;
mod server;
mod statistics;
mod transactions;

pub enum ServerError {
    Engine(EngineError),
    NotFound(String),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_) | EngineError::CurrencyMismatch(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::NotFound(err) => (StatusCode::NOT_FOUND, err),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

/// Engine currency → wire currency.
pub(crate) fn map_currency(currency: engine::Currency) -> api_types::Currency {
    match currency {
        engine::Currency::Usd => api_types::Currency::Usd,
        engine::Currency::Eur => api_types::Currency::Eur,
        engine::Currency::Gbp => api_types::Currency::Gbp,
        engine::Currency::Mxn => api_types::Currency::Mxn,
        engine::Currency::Cad => api_types::Currency::Cad,
        engine::Currency::Aud => api_types::Currency::Aud,
        engine::Currency::Jpy => api_types::Currency::Jpy,
        engine::Currency::Chf => api_types::Currency::Chf,
        engine::Currency::Brl => api_types::Currency::Brl,
        engine::Currency::Cop => api_types::Currency::Cop,
    }
}

/// Wire currency → engine currency.
pub(crate) fn map_api_currency(currency: api_types::Currency) -> engine::Currency {
    match currency {
        api_types::Currency::Usd => engine::Currency::Usd,
        api_types::Currency::Eur => engine::Currency::Eur,
        api_types::Currency::Gbp => engine::Currency::Gbp,
        api_types::Currency::Mxn => engine::Currency::Mxn,
        api_types::Currency::Cad => engine::Currency::Cad,
        api_types::Currency::Aud => engine::Currency::Aud,
        api_types::Currency::Jpy => engine::Currency::Jpy,
        api_types::Currency::Chf => engine::Currency::Chf,
        api_types::Currency::Brl => engine::Currency::Brl,
        api_types::Currency::Cop => engine::Currency::Cop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::InvalidAmount("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn currency_mismatch_maps_to_422() {
        let res =
            ServerError::from(EngineError::CurrencyMismatch("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn not_found_maps_to_404() {
        let res = ServerError::NotFound("rates".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn currency_mapping_round_trips() {
        for currency in engine::Currency::ALL {
            assert_eq!(map_api_currency(map_currency(currency)), currency);
        }
    }
}
