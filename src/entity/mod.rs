//! Entity descriptors: the column table each persisted row type declares once.
//!
//! A row type implements [`Row`] through the [`columns!`](crate::columns) macro, which emits the
//! static column list and the matching value list from a single field list, so the two can never
//! disagree on order or length. Fields left out of the macro are in-memory only.

mod relation;

pub use relation::RelationBatch;

use crate::sql::BindValue;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;

/// What a column means to the statement builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnRole {
    /// Primary key. Replaced with a generated id on insert, used as the key on update.
    Id,
    /// Ordinary persisted value.
    Data,
    /// Written at insert, never reassigned by update (a comment's recipe).
    Fixed,
    /// Integer column adjusted only through atomic increments (likes, views).
    Counter,
    /// Stamped with the current time on insert, never reassigned by update.
    CreatedAt,
    /// Relation rows: receives the owning entity's id at insert time.
    Parent,
    /// Relation rows: the related entity's id.
    Child,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub role: ColumnRole,
}

impl Column {
    pub const fn new(name: &'static str, role: ColumnRole) -> Self {
        Column { name, role }
    }
}

/// A persisted row shape: table name plus column descriptors in declaration order.
pub trait Row: Send + Sync + 'static {
    /// Constant per type, never per instance.
    const TABLE: &'static str;

    fn columns() -> &'static [Column];

    /// Current field values, aligned index-for-index with [`Row::columns`].
    fn values(&self) -> Vec<BindValue>;

    fn column(name: &str) -> Option<&'static Column> {
        Self::columns().iter().find(|c| c.name == name)
    }

    fn column_with_role(role: ColumnRole) -> Option<&'static Column> {
        Self::columns().iter().find(|c| c.role == role)
    }
}

/// A top-level entity addressable by id.
pub trait Entity:
    Row + Serialize + DeserializeOwned + for<'r> sqlx::FromRow<'r, SqliteRow> + Unpin
{
    /// Columns accepted as `order_by` when listing.
    const SORTABLE: &'static [&'static str];

    /// Empty before creation.
    fn id(&self) -> &str;

    /// Groups of relation rows to insert alongside the entity, one group per relation type.
    fn relations(&self) -> Vec<RelationBatch> {
        Vec::new()
    }
}

/// A join-table row linking an owning entity (parent) to a related one (child).
pub trait RelationRow: Row + Serialize + DeserializeOwned + for<'r> sqlx::FromRow<'r, SqliteRow> + Unpin {}

/// Implements [`Row::columns`] and [`Row::values`] from one field list.
///
/// ```ignore
/// impl Row for Ingredient {
///     const TABLE: &'static str = "ingredients";
///     columns! {
///         id => Id,
///         name => Data,
///     }
/// }
/// ```
#[macro_export]
macro_rules! columns {
    ($($field:ident => $role:ident),+ $(,)?) => {
        fn columns() -> &'static [$crate::entity::Column] {
            const COLUMNS: &[$crate::entity::Column] = &[
                $($crate::entity::Column::new(
                    stringify!($field),
                    $crate::entity::ColumnRole::$role,
                )),+
            ];
            COLUMNS
        }

        fn values(&self) -> Vec<$crate::sql::BindValue> {
            vec![$($crate::sql::BindValue::from(&self.$field)),+]
        }
    };
}
