//! Handler factories: wrap a data-access operation into an axum handler for one row type.
//!
//! Each factory takes an async operation `Fn(SqlitePool, input) -> Future<Output = Result<_, AppError>>`
//! and returns a handler closure. Decoding, status codes and the error envelope live here so the
//! per-resource routes only choose which operation to run.

use crate::error::AppError;
use crate::extractors::ListQuery;
use crate::response::{mutation_success, success_many, success_one};
use crate::sql::QueryOptions;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use std::future::Future;
use std::pin::Pin;

pub type HandlerFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// Any JSON body decode failure (syntax, shape, content type) is a 400.
pub fn decode_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Decodes the JSON body into `T`, runs `op` (create or update) and answers `{id, message}`
/// with `status`.
pub fn mutation_handler<T, F, Fut>(
    op: F,
    status: StatusCode,
) -> impl Fn(State<AppState>, Result<Json<T>, JsonRejection>) -> HandlerFuture + Clone + Send + Sync + 'static
where
    T: DeserializeOwned + Send + 'static,
    F: Fn(SqlitePool, T) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<String, AppError>> + Send + 'static,
{
    move |State(state): State<AppState>, body: Result<Json<T>, JsonRejection>| -> HandlerFuture {
        let op = op.clone();
        Box::pin(async move {
            let obj = match decode_body(body) {
                Ok(obj) => obj,
                Err(e) => return e.into_response(),
            };
            match op(state.pool().clone(), obj).await {
                Ok(id) => mutation_success(status, id).into_response(),
                Err(e) => e.into_response(),
            }
        })
    }
}

/// Deletes the row named by the `:id` path segment. Not found maps to 404.
pub fn delete_handler<F, Fut>(
    op: F,
) -> impl Fn(State<AppState>, Path<String>) -> HandlerFuture + Clone + Send + Sync + 'static
where
    F: Fn(SqlitePool, String) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<String, AppError>> + Send + 'static,
{
    move |State(state): State<AppState>, Path(id): Path<String>| -> HandlerFuture {
        let op = op.clone();
        Box::pin(async move {
            match op(state.pool().clone(), id).await {
                Ok(id) => mutation_success(StatusCode::OK, id).into_response(),
                Err(e) => e.into_response(),
            }
        })
    }
}

/// Fetches the row named by the `:id` path segment and answers it as JSON.
pub fn get_handler<T, F, Fut>(
    op: F,
) -> impl Fn(State<AppState>, Path<String>) -> HandlerFuture + Clone + Send + Sync + 'static
where
    T: Serialize + Send + 'static,
    F: Fn(SqlitePool, String) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<T, AppError>> + Send + 'static,
{
    move |State(state): State<AppState>, Path(id): Path<String>| -> HandlerFuture {
        let op = op.clone();
        Box::pin(async move {
            match op(state.pool().clone(), id).await {
                Ok(obj) => success_one(obj).into_response(),
                Err(e) => e.into_response(),
            }
        })
    }
}

/// Parses `page`, `per_page`, `order_by` and answers the page as a JSON array.
pub fn list_handler<T, F, Fut>(
    op: F,
) -> impl Fn(State<AppState>, Result<ListQuery, AppError>) -> HandlerFuture + Clone + Send + Sync + 'static
where
    T: Serialize + Send + 'static,
    F: Fn(SqlitePool, QueryOptions) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>, AppError>> + Send + 'static,
{
    move |State(state): State<AppState>, query: Result<ListQuery, AppError>| -> HandlerFuture {
        let op = op.clone();
        Box::pin(async move {
            let ListQuery(opts) = match query {
                Ok(q) => q,
                Err(e) => return e.into_response(),
            };
            match op(state.pool().clone(), opts).await {
                Ok(rows) => success_many(rows).into_response(),
                Err(e) => e.into_response(),
            }
        })
    }
}
