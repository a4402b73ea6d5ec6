//! Opskrifter: recipe and cookbook REST backend over a descriptor-driven generic CRUD layer.

pub mod config;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::Settings;
pub use entity::{Column, ColumnRole, Entity, RelationBatch, RelationRow, Row};
pub use error::{AppError, ConfigError};
pub use response::{mutation_success, success_many, success_one, MutationResponse};
pub use routes::{api_routes, app, common_routes};
pub use service::{CrudService, RecipeService};
pub use sql::QueryOptions;
pub use state::AppState;
pub use store::Store;
