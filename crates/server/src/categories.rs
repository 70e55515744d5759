//! Categories API endpoints

use api_types::category::{
    CategoriesResponse, CategoryCreated, CategoryNew, CategoryUpdate, CategoryView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::users;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<CategoriesResponse>, ServerError> {
    let categories = state.engine.list_categories(&user.username).await?;

    Ok(Json(CategoriesResponse {
        categories: categories
            .into_iter()
            .map(|category| CategoryView {
                id: category.id,
                name: category.name,
                archived: category.archived,
            })
            .collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryCreated>), ServerError> {
    let id = state
        .engine
        .new_category(&user.username, &payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(CategoryCreated { id })))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_category(
            &user.username,
            id,
            payload.name.as_deref(),
            payload.archived,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
