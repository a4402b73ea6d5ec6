use super::{Column, RelationRow, Row};
use crate::sql::BindValue;

/// Relation rows of a single concrete type with the type erased, so an entity can hand back
/// groups of different relation types from one accessor.
#[derive(Clone, Debug)]
pub struct RelationBatch {
    pub table: &'static str,
    pub columns: &'static [Column],
    pub rows: Vec<Vec<BindValue>>,
}

impl RelationBatch {
    pub fn from_rows<R: RelationRow>(rows: &[R]) -> Self {
        RelationBatch {
            table: R::TABLE,
            columns: R::columns(),
            rows: rows.iter().map(|row| row.values()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
