//! Store handle: SQLite pool lifecycle and table bootstrap for every model type.

use crate::config::Settings;
use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Idempotent DDL, one statement per table. Relation tables cascade on parent delete.
const TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL DEFAULT '',
        email TEXT NOT NULL DEFAULT '',
        status TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS recipes (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL DEFAULT '',
        minutes INTEGER NOT NULL DEFAULT 0,
        description TEXT NOT NULL DEFAULT '',
        likes INTEGER NOT NULL DEFAULT 0,
        comments INTEGER NOT NULL DEFAULT 0,
        views INTEGER NOT NULL DEFAULT 0,
        image TEXT NOT NULL DEFAULT '',
        recipe_cuisine TEXT NOT NULL DEFAULT '',
        user_id TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ingredients (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ingredients_for_recipe (
        recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        ingredient_id TEXT NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
        amount TEXT NOT NULL DEFAULT '',
        PRIMARY KEY (recipe_id, ingredient_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS cookbooks (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL DEFAULT '',
        description TEXT NOT NULL DEFAULT '',
        likes INTEGER NOT NULL DEFAULT 0,
        user_id TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS cookbook_recipes (
        cookbook_id TEXT NOT NULL REFERENCES cookbooks(id) ON DELETE CASCADE,
        recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        PRIMARY KEY (cookbook_id, recipe_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS comments (
        id TEXT PRIMARY KEY NOT NULL,
        recipe_id TEXT NOT NULL DEFAULT '',
        user_id TEXT NOT NULL DEFAULT '',
        comment TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_liked_recipes (
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        PRIMARY KEY (user_id, recipe_id)
    )
    "#,
];

/// Shared, cloneable handle to the store. Owned by the process entry point.
#[derive(Clone, Debug)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens the pool with foreign keys enforced. File databases use the WAL journal; an
    /// in-memory database lives on one connection that is never recycled.
    pub async fn connect(settings: &Settings) -> Result<Self, AppError> {
        let in_memory = settings.database_url.contains(":memory:");
        let mut options = SqliteConnectOptions::from_str(&settings.database_url)?
            .foreign_keys(true)
            .create_if_missing(true);
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }
        let max_connections = if in_memory { 1 } else { settings.max_connections.max(1) };
        let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
        if in_memory {
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }
        let pool = pool_options.connect_with(options).await?;
        tracing::info!(url = %settings.database_url, max_connections, "store connected");
        Ok(Store { pool })
    }

    /// In-memory store with every table created.
    pub async fn in_memory() -> Result<Self, AppError> {
        let settings = Settings {
            database_url: "sqlite::memory:".into(),
            ..Settings::default()
        };
        let store = Store::connect(&settings).await?;
        store.ensure_tables().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates every model table that does not exist yet.
    pub async fn ensure_tables(&self) -> Result<(), AppError> {
        for ddl in TABLES {
            sqlx::query(ddl).execute(&self.pool).await?;
        }
        tracing::info!(tables = TABLES.len(), "tables ensured");
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("store closed");
    }
}
