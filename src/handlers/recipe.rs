//! Recipe counter and relation handlers: views, likes, ingredient and like listings.

use crate::error::AppError;
use crate::handlers::generic::decode_body;
use crate::model::{RecipeIngredient, UserLikedRecipe};
use crate::response::{mutation_success, success_many};
use crate::service::{CrudService, RecipeService};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LikeRequest {
    pub user_id: String,
}

pub async fn view(
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    RecipeService::view_recipe(state.pool(), &recipe_id).await?;
    Ok(mutation_success(StatusCode::OK, recipe_id))
}

pub async fn like(
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
    body: Result<Json<LikeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = decode_body(body)?;
    RecipeService::like_recipe(state.pool(), &req.user_id, &recipe_id).await?;
    Ok(mutation_success(StatusCode::CREATED, recipe_id))
}

pub async fn unlike(
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
    body: Result<Json<LikeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = decode_body(body)?;
    RecipeService::unlike_recipe(state.pool(), &req.user_id, &recipe_id).await?;
    Ok(mutation_success(StatusCode::OK, recipe_id))
}

pub async fn ingredients(
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let rows: Vec<RecipeIngredient> = CrudService::list_relations(state.pool(), &recipe_id).await?;
    Ok(success_many(rows))
}

/// Recipes a user has liked, as relation rows.
pub async fn user_likes(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let rows: Vec<UserLikedRecipe> = CrudService::list_relations(state.pool(), &user_id).await?;
    Ok(success_many(rows))
}
