//! Budgets API endpoints

use api_types::budget::{BudgetCreated, BudgetList, BudgetNew, BudgetUpdate, BudgetView, BudgetsResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::users;
use uuid::Uuid;

use crate::{ServerError, map_api_currency, map_currency, server::ServerState};

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetList>,
) -> Result<Json<BudgetsResponse>, ServerError> {
    let budgets = state
        .engine
        .list_budgets(&user.username, &payload.month)
        .await?;

    Ok(Json(BudgetsResponse {
        budgets: budgets
            .into_iter()
            .map(|(budget, spent_minor)| BudgetView {
                id: budget.id,
                category_id: budget.category_id,
                month: budget.month,
                limit_minor: budget.limit_minor,
                spent_minor,
                currency: map_currency(budget.currency),
            })
            .collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<BudgetCreated>), ServerError> {
    let id = state
        .engine
        .new_budget(
            &user.username,
            payload.category_id,
            &payload.month,
            payload.limit_minor,
            map_api_currency(payload.currency),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(BudgetCreated { id })))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BudgetUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_budget(&user.username, id, payload.limit_minor)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_budget(&user.username, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
