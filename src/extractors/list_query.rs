//! Extract list options (`page`, `per_page`, `order_by`) from the query string.

use crate::error::AppError;
use crate::sql::QueryOptions;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

/// Query options for list endpoints. Non-integer `page` or `per_page` is a bad request.
#[derive(Clone, Debug, Default)]
pub struct ListQuery(pub QueryOptions);

#[async_trait]
impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(opts) = Query::<QueryOptions>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(ListQuery(opts))
    }
}
