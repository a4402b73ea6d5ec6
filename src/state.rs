//! Shared application state for all routes.

use crate::store::Store;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        AppState { store }
    }

    pub fn pool(&self) -> &SqlitePool {
        self.store.pool()
    }
}
