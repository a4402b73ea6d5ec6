//! Resource routes: the generic CRUD set per row type, plus recipe counters and comments.

use crate::entity::Entity;
use crate::handlers::recipe;
use crate::handlers::{delete_handler, get_handler, list_handler, mutation_handler};
use crate::model::{Comment, Cookbook, Ingredient, Recipe, User};
use crate::service::{CrudService, RecipeService};
use crate::state::AppState;
use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;

/// `POST` creates (with relation rows), `PUT` updates by body id, `GET` lists;
/// `GET`/`DELETE` on `/:id` read and remove one row.
fn crud_routes<T: Entity>(path: &str) -> Router<AppState> {
    Router::new()
        .route(
            path,
            post(mutation_handler(
                |pool: SqlitePool, obj: T| async move {
                    CrudService::create_with_relations(&pool, &obj).await
                },
                StatusCode::CREATED,
            ))
            .put(mutation_handler(
                |pool: SqlitePool, obj: T| async move { CrudService::update(&pool, &obj).await },
                StatusCode::OK,
            ))
            .get(list_handler(|pool: SqlitePool, opts| async move {
                CrudService::list::<T>(&pool, &opts).await
            })),
        )
        .route(
            &format!("{}/:id", path),
            get(get_handler(|pool: SqlitePool, id: String| async move {
                CrudService::get::<T>(&pool, &id).await
            }))
            .delete(delete_handler(|pool: SqlitePool, id: String| async move {
                CrudService::delete::<T>(&pool, &id).await
            })),
        )
}

/// Comments share the generic handlers but create and delete through [`RecipeService`]
/// so the recipe's comment count follows.
fn comment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/comments",
            post(mutation_handler(
                |pool: SqlitePool, comment: Comment| async move {
                    RecipeService::add_comment(&pool, comment).await
                },
                StatusCode::CREATED,
            ))
            .put(mutation_handler(
                |pool: SqlitePool, comment: Comment| async move {
                    CrudService::update(&pool, &comment).await
                },
                StatusCode::OK,
            ))
            .get(list_handler(|pool: SqlitePool, opts| async move {
                CrudService::list::<Comment>(&pool, &opts).await
            })),
        )
        .route(
            "/comments/:id",
            get(get_handler(|pool: SqlitePool, id: String| async move {
                CrudService::get::<Comment>(&pool, &id).await
            }))
            .delete(delete_handler(|pool: SqlitePool, id: String| async move {
                RecipeService::remove_comment(&pool, &id).await
            })),
        )
}

/// All resource routes. Call `.with_state` on the result (or merge into a stateful router).
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(crud_routes::<User>("/users"))
        .merge(crud_routes::<Recipe>("/recipes"))
        .merge(crud_routes::<Ingredient>("/ingredients"))
        .merge(crud_routes::<Cookbook>("/cookbooks"))
        .merge(comment_routes())
        .route("/recipes/:id/views", post(recipe::view))
        .route("/recipes/:id/like", post(recipe::like).delete(recipe::unlike))
        .route("/recipes/:id/ingredients", get(recipe::ingredients))
        .route("/users/:id/likes", get(recipe::user_likes))
}
