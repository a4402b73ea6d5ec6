//! Response bodies shared by the handlers.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

pub const SUCCESS_MESSAGE: &str = "operation succeeded";

/// Body of every successful create, update or delete: the affected id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub id: String,
    pub message: String,
}

impl MutationResponse {
    pub fn new(id: impl Into<String>) -> Self {
        MutationResponse {
            id: id.into(),
            message: SUCCESS_MESSAGE.to_string(),
        }
    }
}

pub fn mutation_success(status: StatusCode, id: impl Into<String>) -> (StatusCode, Json<MutationResponse>) {
    (status, Json(MutationResponse::new(id)))
}

pub fn success_one<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn success_many<T: Serialize>(data: Vec<T>) -> (StatusCode, Json<Vec<T>>) {
    (StatusCode::OK, Json(data))
}
