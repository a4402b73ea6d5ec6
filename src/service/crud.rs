//! Generic CRUD execution against SQLite, one instantiation per row type.

use crate::entity::{Entity, RelationBatch, RelationRow};
use crate::error::AppError;
use crate::service::executor::{execute, expect_rows, fetch_all, fetch_count, fetch_optional};
use crate::sql::{
    checked_identifier, count, delete_by_id, delete_relation, increment, insert, relation_insert,
    select_by_id, select_list, select_relation, select_relations_of, update, QueryOptions,
};
use sqlx::SqlitePool;

pub struct CrudService;

impl CrudService {
    /// Insert one row under a freshly generated id. Returns that id.
    pub async fn create<T: Entity>(pool: &SqlitePool, obj: &T) -> Result<String, AppError> {
        let built = insert(obj)?;
        let affected = execute(pool, &built.query)
            .await
            .map_err(AppError::execution("insert", T::TABLE))?;
        expect_rows(T::TABLE, 1, affected)?;
        tracing::debug!(table = T::TABLE, id = %built.id, "created");
        Ok(built.id)
    }

    /// Insert the entity and every non-empty relation group in one transaction keyed by the
    /// new id. Any failure rolls back the whole write, parent row included.
    pub async fn create_with_relations<T: Entity>(
        pool: &SqlitePool,
        obj: &T,
    ) -> Result<String, AppError> {
        let built = insert(obj)?;
        let batches: Vec<RelationBatch> = obj
            .relations()
            .into_iter()
            .filter(|b| !b.is_empty())
            .collect();
        let relation_queries = batches
            .iter()
            .map(|b| relation_insert(&built.id, b))
            .collect::<Result<Vec<_>, _>>()?;

        let mut tx = pool.begin().await?;
        let affected = execute(&mut *tx, &built.query)
            .await
            .map_err(AppError::execution("insert", T::TABLE))?;
        expect_rows(T::TABLE, 1, affected)?;
        for (batch, q) in batches.iter().zip(&relation_queries) {
            let affected = execute(&mut *tx, q)
                .await
                .map_err(AppError::execution("insert relations", batch.table))?;
            expect_rows(batch.table, batch.len() as u64, affected)?;
        }
        tx.commit().await?;
        tracing::debug!(
            table = T::TABLE,
            id = %built.id,
            relation_groups = batches.len(),
            "created with relations"
        );
        Ok(built.id)
    }

    pub async fn get<T: Entity>(pool: &SqlitePool, id: &str) -> Result<T, AppError> {
        let q = select_by_id(T::TABLE, id);
        fetch_optional::<_, T>(pool, &q)
            .await
            .map_err(AppError::execution("get", T::TABLE))?
            .ok_or_else(|| AppError::NotFound {
                table: T::TABLE,
                id: id.to_string(),
            })
    }

    /// Update by the entity's own id. Zero affected rows means the id does not exist.
    pub async fn update<T: Entity>(pool: &SqlitePool, obj: &T) -> Result<String, AppError> {
        if obj.id().is_empty() {
            return Err(AppError::Validation(format!(
                "id is required to update {}",
                T::TABLE
            )));
        }
        let q = update(obj)?;
        let affected = execute(pool, &q)
            .await
            .map_err(AppError::execution("update", T::TABLE))?;
        expect_rows(T::TABLE, 1, affected)?;
        Ok(obj.id().to_string())
    }

    /// Delete by id. Zero affected rows is reported as not found.
    pub async fn delete<T: Entity>(pool: &SqlitePool, id: &str) -> Result<String, AppError> {
        let q = delete_by_id(T::TABLE, id);
        let affected = execute(pool, &q)
            .await
            .map_err(AppError::execution("delete", T::TABLE))?;
        if affected == 0 {
            return Err(AppError::NotFound {
                table: T::TABLE,
                id: id.to_string(),
            });
        }
        Ok(id.to_string())
    }

    pub async fn count<T: Entity>(pool: &SqlitePool) -> Result<i64, AppError> {
        fetch_count(pool, &count(T::TABLE))
            .await
            .map_err(AppError::execution("count", T::TABLE))
    }

    /// Row count of any table by name. The name must be a plain identifier.
    pub async fn count_by_table(pool: &SqlitePool, table: &str) -> Result<i64, AppError> {
        let table = checked_identifier(table)?;
        fetch_count(pool, &count(table))
            .await
            .map_err(AppError::execution("count", table))
    }

    /// One page of rows. Validation and order-by errors surface before any statement runs.
    pub async fn list<T: Entity>(pool: &SqlitePool, opts: &QueryOptions) -> Result<Vec<T>, AppError> {
        opts.validate()?;
        let q = select_list(T::TABLE, T::SORTABLE, opts)?;
        fetch_all(pool, &q)
            .await
            .map_err(AppError::execution("list", T::TABLE))
    }

    /// Creates each entity in turn. Stops at the first failure; earlier rows stay committed.
    pub async fn create_many<T: Entity>(pool: &SqlitePool, items: &[T]) -> Result<Vec<String>, AppError> {
        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            ids.push(Self::create(pool, item).await?);
        }
        Ok(ids)
    }

    /// Deletes each id in turn. Stops at the first failure; earlier deletes stay committed.
    pub async fn delete_many<T: Entity>(pool: &SqlitePool, ids: &[String]) -> Result<Vec<String>, AppError> {
        let mut deleted = Vec::with_capacity(ids.len());
        for id in ids {
            deleted.push(Self::delete::<T>(pool, id).await?);
        }
        Ok(deleted)
    }

    /// Batched relation insert for an existing parent. Returns the number of rows written.
    pub async fn insert_relations(
        pool: &SqlitePool,
        parent_id: &str,
        batch: &RelationBatch,
    ) -> Result<u64, AppError> {
        let q = relation_insert(parent_id, batch)?;
        let affected = execute(pool, &q)
            .await
            .map_err(AppError::execution("insert relations", batch.table))?;
        expect_rows(batch.table, batch.len() as u64, affected)?;
        Ok(affected)
    }

    pub async fn get_relation<R: RelationRow>(
        pool: &SqlitePool,
        parent_id: &str,
        child_id: &str,
    ) -> Result<R, AppError> {
        let q = select_relation::<R>(parent_id, child_id)?;
        fetch_optional::<_, R>(pool, &q)
            .await
            .map_err(AppError::execution("get relation", R::TABLE))?
            .ok_or_else(|| AppError::NotFound {
                table: R::TABLE,
                id: format!("{}/{}", parent_id, child_id),
            })
    }

    pub async fn list_relations<R: RelationRow>(
        pool: &SqlitePool,
        parent_id: &str,
    ) -> Result<Vec<R>, AppError> {
        let q = select_relations_of::<R>(parent_id)?;
        fetch_all(pool, &q)
            .await
            .map_err(AppError::execution("list relations", R::TABLE))
    }

    pub async fn delete_relation<R: RelationRow>(
        pool: &SqlitePool,
        parent_id: &str,
        child_id: &str,
    ) -> Result<(), AppError> {
        let q = delete_relation::<R>(parent_id, child_id)?;
        let affected = execute(pool, &q)
            .await
            .map_err(AppError::execution("delete relation", R::TABLE))?;
        if affected == 0 {
            return Err(AppError::NotFound {
                table: R::TABLE,
                id: format!("{}/{}", parent_id, child_id),
            });
        }
        Ok(())
    }

    /// Adds `delta` to a counter column in a single statement, safe under concurrent callers.
    pub async fn increment<T: Entity>(
        pool: &SqlitePool,
        id: &str,
        column: &str,
        delta: i64,
    ) -> Result<(), AppError> {
        let q = increment::<T>(id, column, delta)?;
        let affected = execute(pool, &q)
            .await
            .map_err(AppError::execution("increment", T::TABLE))?;
        if affected == 0 {
            return Err(AppError::NotFound {
                table: T::TABLE,
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
