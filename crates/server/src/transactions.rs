//! Transactions API endpoints

use api_types::transaction::{
    ExpenseNew, IncomeNew, TransactionCreated, TransactionKind as ApiKind, TransactionList,
    TransactionListResponse, TransactionUpdate, TransactionView, TransactionVoid, TransferNew,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{FixedOffset, Utc};
use engine::users;
use uuid::Uuid;

use crate::{ServerError, map_currency, server::ServerState};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
        engine::TransactionKind::Transfer => ApiKind::Transfer,
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionList>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let limit = payload.limit.unwrap_or(50);
    let include_voided = payload.include_voided.unwrap_or(false);

    let txs = state
        .engine
        .list_transactions(&user.username, payload.account_id, limit, include_voided)
        .await?;

    let utc = FixedOffset::east_opt(0)
        .ok_or_else(|| ServerError::Generic("invalid UTC offset".to_string()))?;
    let transactions = txs
        .into_iter()
        .map(|(tx, amount_minor)| TransactionView {
            id: tx.id,
            kind: map_kind(tx.kind),
            occurred_at: tx.occurred_at.with_timezone(&utc),
            amount_minor,
            currency: map_currency(tx.currency),
            category_id: tx.category_id,
            note: tx.note,
            voided: tx.voided_at.is_some(),
        })
        .collect();

    Ok(Json(TransactionListResponse { transactions }))
}

pub async fn income_new(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<IncomeNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let id = state
        .engine
        .income(
            &user.username,
            payload.account_id,
            payload.amount_minor,
            payload.category_id,
            payload.note.as_deref(),
            payload.occurred_at.with_timezone(&Utc),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TransactionCreated { id })))
}

pub async fn expense_new(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let id = state
        .engine
        .expense(
            &user.username,
            payload.account_id,
            payload.amount_minor,
            payload.category_id,
            payload.note.as_deref(),
            payload.occurred_at.with_timezone(&Utc),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TransactionCreated { id })))
}

pub async fn transfer_new(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransferNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let id = state
        .engine
        .transfer(
            &user.username,
            payload.from_account_id,
            payload.to_account_id,
            payload.amount_minor,
            payload.note.as_deref(),
            payload.occurred_at.with_timezone(&Utc),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TransactionCreated { id })))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_transaction(
            &user.username,
            id,
            payload.amount_minor,
            payload.category_id,
            payload.note.as_deref(),
            payload.occurred_at.map(|dt| dt.with_timezone(&Utc)),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn void_tx(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionVoid>,
) -> Result<StatusCode, ServerError> {
    let voided_at = payload
        .voided_at
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    state
        .engine
        .void_transaction(&user.username, id, voided_at)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
