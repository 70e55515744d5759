//! Goals API endpoints

use api_types::goal::{GoalCreated, GoalNew, GoalUpdate, GoalView, GoalsResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{GoalPatch, users};
use uuid::Uuid;

use crate::{ServerError, map_api_currency, map_currency, server::ServerState};

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<GoalsResponse>, ServerError> {
    let goals = state.engine.list_goals(&user.username).await?;

    Ok(Json(GoalsResponse {
        goals: goals
            .into_iter()
            .map(|goal| GoalView {
                id: goal.id,
                name: goal.name,
                target_minor: goal.target_minor,
                saved_minor: goal.saved_minor,
                currency: map_currency(goal.currency),
                target_date: goal.target_date,
                archived: goal.archived,
            })
            .collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<GoalNew>,
) -> Result<(StatusCode, Json<GoalCreated>), ServerError> {
    let id = state
        .engine
        .new_goal(
            &user.username,
            &payload.name,
            payload.target_minor,
            map_api_currency(payload.currency),
            payload.target_date,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(GoalCreated { id })))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GoalUpdate>,
) -> Result<StatusCode, ServerError> {
    let patch = GoalPatch {
        name: payload.name,
        target_minor: payload.target_minor,
        saved_minor: payload.saved_minor,
        target_date: payload.target_date,
        archived: payload.archived,
    };

    state.engine.update_goal(&user.username, id, patch).await?;

    Ok(StatusCode::NO_CONTENT)
}
