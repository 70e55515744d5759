//! Accounts API endpoints

use api_types::account::{AccountCreated, AccountNew, AccountUpdate, AccountView, AccountsResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::users;
use uuid::Uuid;

use crate::{ServerError, map_api_currency, map_currency, server::ServerState};

fn account_view(account: engine::Account) -> AccountView {
    AccountView {
        id: account.id,
        name: account.name,
        currency: map_currency(account.currency),
        balance_minor: account.balance_minor,
        archived: account.archived,
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<AccountsResponse>, ServerError> {
    let accounts = state.engine.list_accounts(&user.username).await?;

    Ok(Json(AccountsResponse {
        accounts: accounts.into_iter().map(account_view).collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<(StatusCode, Json<AccountCreated>), ServerError> {
    let id = state
        .engine
        .new_account(
            &user.username,
            &payload.name,
            map_api_currency(payload.currency),
            payload.opening_minor,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(AccountCreated { id })))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AccountUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_account(
            &user.username,
            id,
            payload.name.as_deref(),
            payload.archived,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
