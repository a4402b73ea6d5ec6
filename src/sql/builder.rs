//! Builds parameterized INSERT, SELECT, UPDATE, DELETE from row descriptors.

use crate::entity::{ColumnRole, Entity, RelationBatch, RelationRow, Row};
use crate::error::AppError;
use crate::sql::{BindValue, QueryOptions};
use regex::Regex;
use std::sync::OnceLock;

/// Quote identifier for SQLite (safe: only from descriptors or validated names).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

const IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]{0,62}$";

static IDENTIFIER: OnceLock<Option<Regex>> = OnceLock::new();

/// SQLite's default cap on bound parameters per statement.
pub const MAX_BIND_PARAMS: usize = 32_766;

/// Table names that do not come from a descriptor must look like plain identifiers.
pub fn checked_identifier(name: &str) -> Result<&str, AppError> {
    match IDENTIFIER.get_or_init(|| Regex::new(IDENTIFIER_PATTERN).ok()) {
        Some(re) if re.is_match(name) => Ok(name),
        _ => Err(AppError::Validation(format!("invalid identifier: {:?}", name))),
    }
}

/// Fresh primary key: random 128-bit UUID in hyphenated form.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: BindValue) {
        self.params.push(v);
    }
}

/// INSERT for a new entity plus the id it will be stored under.
#[derive(Clone, Debug)]
pub struct InsertQuery {
    pub query: QueryBuf,
    pub id: String,
}

/// INSERT with every declared column in declaration order. The id column always gets a
/// freshly generated id, a created-at column the current time and counters start at zero,
/// whatever the caller sent.
pub fn insert<T: Entity>(obj: &T) -> Result<InsertQuery, AppError> {
    if T::column_with_role(ColumnRole::Id).is_none() {
        return Err(AppError::MissingColumnRole {
            table: T::TABLE,
            role: "id",
        });
    }
    let mut q = QueryBuf::new();
    let id = generate_id();
    let mut cols = Vec::new();
    for (c, val) in T::columns().iter().zip(obj.values()) {
        let val = match c.role {
            ColumnRole::Id => BindValue::Text(id.clone()),
            ColumnRole::CreatedAt => BindValue::Text(now_timestamp()),
            ColumnRole::Counter => BindValue::I64(0),
            _ => val,
        };
        cols.push(quoted(c.name));
        q.push_param(val);
    }
    let placeholders = vec!["?"; cols.len()].join(", ");
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quoted(T::TABLE),
        cols.join(", "),
        placeholders
    );
    Ok(InsertQuery { query: q, id })
}

/// UPDATE by id: every data column becomes `col = ?` in declaration order, the id is the
/// last parameter. Created-at and fixed columns keep their inserted value and counters only
/// move through [`increment`], so all three are skipped.
pub fn update<T: Entity>(obj: &T) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    let mut key: Option<(&'static str, BindValue)> = None;
    for (c, val) in T::columns().iter().zip(obj.values()) {
        match c.role {
            ColumnRole::Id => key = Some((c.name, val)),
            ColumnRole::CreatedAt | ColumnRole::Fixed | ColumnRole::Counter => {}
            _ => {
                sets.push(format!("{} = ?", quoted(c.name)));
                q.push_param(val);
            }
        }
    }
    let (id_col, id_val) = key.ok_or(AppError::MissingColumnRole {
        table: T::TABLE,
        role: "id",
    })?;
    if sets.is_empty() {
        return Err(AppError::Validation(format!(
            "{} has no updatable columns",
            T::TABLE
        )));
    }
    q.push_param(id_val);
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        quoted(T::TABLE),
        sets.join(", "),
        quoted(id_col)
    );
    Ok(q)
}

/// SELECT by primary key with the id already bound.
pub fn select_by_id(table: &str, id: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT * FROM {} WHERE \"id\" = ?", quoted(table));
    q.push_param(BindValue::from(id));
    q
}

/// DELETE by primary key with the id already bound.
pub fn delete_by_id(table: &str, id: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("DELETE FROM {} WHERE \"id\" = ?", quoted(table));
    q.push_param(BindValue::from(id));
    q
}

pub fn count(table: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT COUNT(*) FROM {}", quoted(table));
    q
}

/// SELECT page of rows, sorted when `order_by` is present. An `order_by` outside `sortable`
/// is an error.
pub fn select_list(
    table: &str,
    sortable: &[&str],
    opts: &QueryOptions,
) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let order_clause = match opts.order_by() {
        Some(col) if sortable.contains(&col) => format!(" ORDER BY {}", quoted(col)),
        Some(col) => return Err(AppError::InvalidOrderBy(col.to_string())),
        None => String::new(),
    };
    q.sql = format!(
        "SELECT * FROM {}{} LIMIT ? OFFSET ?",
        quoted(table),
        order_clause
    );
    q.push_param(BindValue::I64(opts.per_page()));
    q.push_param(BindValue::I64(opts.offset()));
    Ok(q)
}

/// One multi-row INSERT for a relation batch. The parent column is bound to `parent_id` for
/// every row, ignoring whatever parent the in-memory rows carry. Batches needing more than
/// [`MAX_BIND_PARAMS`] parameters are rejected.
pub fn relation_insert(parent_id: &str, batch: &RelationBatch) -> Result<QueryBuf, AppError> {
    let has_role = |role| batch.columns.iter().any(|c| c.role == role);
    if !has_role(ColumnRole::Parent) || !has_role(ColumnRole::Child) {
        return Err(AppError::MissingColumnRole {
            table: batch.table,
            role: "parent/child",
        });
    }
    if batch.is_empty() {
        return Err(AppError::Validation(format!(
            "no rows provided for {}",
            batch.table
        )));
    }
    if batch.len() * batch.columns.len() > MAX_BIND_PARAMS {
        return Err(AppError::Validation(format!(
            "{} rows for {} exceed {} bound parameters",
            batch.len(),
            batch.table,
            MAX_BIND_PARAMS
        )));
    }
    let mut q = QueryBuf::new();
    let cols: Vec<String> = batch.columns.iter().map(|c| quoted(c.name)).collect();
    let tuple = format!("({})", vec!["?"; cols.len()].join(", "));
    let mut tuples = Vec::with_capacity(batch.len());
    for row in &batch.rows {
        for (c, val) in batch.columns.iter().zip(row) {
            if c.role == ColumnRole::Parent {
                q.push_param(BindValue::from(parent_id));
            } else {
                q.push_param(val.clone());
            }
        }
        tuples.push(tuple.clone());
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES {}",
        quoted(batch.table),
        cols.join(", "),
        tuples.join(", ")
    );
    Ok(q)
}

fn relation_keys<R: RelationRow>() -> Result<(&'static str, &'static str), AppError> {
    match (
        R::column_with_role(ColumnRole::Parent),
        R::column_with_role(ColumnRole::Child),
    ) {
        (Some(p), Some(c)) => Ok((p.name, c.name)),
        _ => Err(AppError::MissingColumnRole {
            table: R::TABLE,
            role: "parent/child",
        }),
    }
}

/// SELECT one relation row by parent and child id.
pub fn select_relation<R: RelationRow>(parent_id: &str, child_id: &str) -> Result<QueryBuf, AppError> {
    let (parent, child) = relation_keys::<R>()?;
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT * FROM {} WHERE {} = ? AND {} = ?",
        quoted(R::TABLE),
        quoted(parent),
        quoted(child)
    );
    q.push_param(BindValue::from(parent_id));
    q.push_param(BindValue::from(child_id));
    Ok(q)
}

/// SELECT every relation row owned by `parent_id`.
pub fn select_relations_of<R: RelationRow>(parent_id: &str) -> Result<QueryBuf, AppError> {
    let (parent, child) = relation_keys::<R>()?;
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT * FROM {} WHERE {} = ? ORDER BY {}",
        quoted(R::TABLE),
        quoted(parent),
        quoted(child)
    );
    q.push_param(BindValue::from(parent_id));
    Ok(q)
}

/// DELETE one relation row by parent and child id.
pub fn delete_relation<R: RelationRow>(parent_id: &str, child_id: &str) -> Result<QueryBuf, AppError> {
    let (parent, child) = relation_keys::<R>()?;
    let mut q = QueryBuf::new();
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ? AND {} = ?",
        quoted(R::TABLE),
        quoted(parent),
        quoted(child)
    );
    q.push_param(BindValue::from(parent_id));
    q.push_param(BindValue::from(child_id));
    Ok(q)
}

/// Atomic `col = col + delta` on a counter column. Never a read followed by a write.
pub fn increment<T: Entity>(id: &str, column: &str, delta: i64) -> Result<QueryBuf, AppError> {
    if id.is_empty() {
        return Err(AppError::Validation(format!("no id for {}", T::TABLE)));
    }
    let col = T::column(column)
        .filter(|c| c.role == ColumnRole::Counter)
        .ok_or_else(|| {
            AppError::Validation(format!("{} is not a counter column of {}", column, T::TABLE))
        })?;
    let mut q = QueryBuf::new();
    let name = quoted(col.name);
    q.sql = format!(
        "UPDATE {} SET {} = {} + ? WHERE \"id\" = ?",
        quoted(T::TABLE),
        name,
        name
    );
    q.push_param(BindValue::I64(delta));
    q.push_param(BindValue::from(id));
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Comment, Ingredient, Recipe, RecipeIngredient, UserLikedRecipe};

    fn soup() -> Recipe {
        Recipe {
            id: "caller-supplied".into(),
            name: "Tomato Soup".into(),
            minutes: 25,
            description: "Blend and simmer".into(),
            created_at: "1999-01-01".into(),
            ..Default::default()
        }
    }

    #[test]
    fn insert_replaces_caller_id_with_generated_one() {
        let built = insert(&soup()).unwrap();
        assert!(!built.id.is_empty());
        assert_ne!(built.id, "caller-supplied");
        assert!(uuid::Uuid::parse_str(&built.id).is_ok());
        assert_eq!(built.query.params[0], BindValue::Text(built.id.clone()));
    }

    #[test]
    fn insert_lists_columns_in_declaration_order() {
        let built = insert(&soup()).unwrap();
        assert_eq!(
            built.query.sql,
            "INSERT INTO \"recipes\" (\"id\", \"name\", \"minutes\", \"description\", \"likes\", \
             \"comments\", \"views\", \"image\", \"recipe_cuisine\", \"user_id\", \"created_at\") \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );
        assert_eq!(built.query.params.len(), Recipe::columns().len());
        assert_eq!(built.query.params[1], BindValue::Text("Tomato Soup".into()));
        assert_eq!(built.query.params[2], BindValue::I64(25));
    }

    #[test]
    fn insert_stamps_created_at() {
        let built = insert(&soup()).unwrap();
        let stamp = built.query.params.last().and_then(BindValue::as_str).unwrap();
        assert_ne!(stamp, "1999-01-01");
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[test]
    fn insert_starts_counters_at_zero() {
        let recipe = Recipe {
            likes: 999,
            comments: 42,
            views: 5000,
            ..soup()
        };
        let built = insert(&recipe).unwrap();
        for name in ["likes", "comments", "views"] {
            let idx = Recipe::columns().iter().position(|c| c.name == name).unwrap();
            assert_eq!(built.query.params[idx], BindValue::I64(0), "{}", name);
        }
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = insert(&soup()).unwrap().id;
        let b = insert(&soup()).unwrap().id;
        assert_ne!(a, b);
    }

    #[test]
    fn update_keys_on_id_as_last_param() {
        let mut recipe = soup();
        recipe.id = "abc".into();
        let q = update(&recipe).unwrap();
        assert_eq!(
            q.sql,
            "UPDATE \"recipes\" SET \"name\" = ?, \"minutes\" = ?, \"description\" = ?, \
             \"image\" = ?, \"recipe_cuisine\" = ?, \"user_id\" = ? WHERE \"id\" = ?"
        );
        assert_eq!(q.params.last(), Some(&BindValue::Text("abc".into())));
        assert_eq!(q.params.len(), 7);
    }

    #[test]
    fn update_leaves_fixed_columns_alone() {
        let comment = Comment {
            id: "c1".into(),
            recipe_id: "elsewhere".into(),
            user_id: "someone-else".into(),
            comment: "Edited".into(),
            ..Default::default()
        };
        let q = update(&comment).unwrap();
        assert_eq!(q.sql, "UPDATE \"comments\" SET \"comment\" = ? WHERE \"id\" = ?");
        assert_eq!(q.params, vec![BindValue::from("Edited"), BindValue::from("c1")]);
    }

    #[test]
    fn select_list_sorts_and_paginates() {
        let q = select_list("recipes", Recipe::SORTABLE, &QueryOptions::new(2, 5, Some("name"))).unwrap();
        assert_eq!(q.sql, "SELECT * FROM \"recipes\" ORDER BY \"name\" LIMIT ? OFFSET ?");
        assert_eq!(q.params, vec![BindValue::I64(5), BindValue::I64(5)]);
    }

    #[test]
    fn select_list_without_order_by_uses_defaults() {
        let q = select_list("ingredients", Ingredient::SORTABLE, &QueryOptions::default()).unwrap();
        assert_eq!(q.sql, "SELECT * FROM \"ingredients\" LIMIT ? OFFSET ?");
        assert_eq!(q.params, vec![BindValue::I64(10), BindValue::I64(0)]);
    }

    #[test]
    fn select_list_rejects_unknown_order_by() {
        let err = select_list(
            "recipes",
            Recipe::SORTABLE,
            &QueryOptions::new(1, 10, Some("nonexistent_column")),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidOrderBy(ref c) if c == "nonexistent_column"));

        let err = select_list(
            "recipes",
            Recipe::SORTABLE,
            &QueryOptions::new(1, 10, Some("name; DROP TABLE recipes")),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidOrderBy(_)));
    }

    #[test]
    fn relation_insert_batches_rows_and_binds_parent() {
        let rows = vec![
            RecipeIngredient {
                recipe_id: "stale".into(),
                ingredient_id: "i1".into(),
                amount: "2 cups".into(),
            },
            RecipeIngredient {
                recipe_id: String::new(),
                ingredient_id: "i2".into(),
                amount: "1 tsp".into(),
            },
        ];
        let q = relation_insert("r1", &RelationBatch::from_rows(&rows)).unwrap();
        assert_eq!(
            q.sql,
            "INSERT INTO \"ingredients_for_recipe\" (\"recipe_id\", \"ingredient_id\", \"amount\") \
             VALUES (?, ?, ?), (?, ?, ?)"
        );
        assert_eq!(
            q.params,
            vec![
                BindValue::from("r1"),
                BindValue::from("i1"),
                BindValue::from("2 cups"),
                BindValue::from("r1"),
                BindValue::from("i2"),
                BindValue::from("1 tsp"),
            ]
        );
    }

    #[test]
    fn relation_insert_requires_parent_and_child_roles() {
        let batch = RelationBatch {
            table: Ingredient::TABLE,
            columns: Ingredient::columns(),
            rows: vec![vec![BindValue::from("i1"), BindValue::from("Salt")]],
        };
        let err = relation_insert("r1", &batch).unwrap_err();
        assert!(matches!(err, AppError::MissingColumnRole { table: "ingredients", .. }));
    }

    #[test]
    fn relation_insert_rejects_empty_batch() {
        let batch = RelationBatch::from_rows::<RecipeIngredient>(&[]);
        assert!(matches!(relation_insert("r1", &batch), Err(AppError::Validation(_))));
    }

    #[test]
    fn relation_insert_rejects_batches_past_parameter_cap() {
        let rows = MAX_BIND_PARAMS / RecipeIngredient::columns().len() + 1;
        let batch = RelationBatch {
            table: RecipeIngredient::TABLE,
            columns: RecipeIngredient::columns(),
            rows: vec![vec![BindValue::from("r"), BindValue::from("i"), BindValue::from("1")]; rows],
        };
        assert!(matches!(relation_insert("r1", &batch), Err(AppError::Validation(_))));

        let batch = RelationBatch {
            rows: vec![batch.rows[0].clone(); rows - 1],
            ..batch
        };
        assert!(relation_insert("r1", &batch).is_ok());
    }

    #[test]
    fn relation_lookup_uses_parent_and_child_columns() {
        let q = delete_relation::<UserLikedRecipe>("u1", "r1").unwrap();
        assert_eq!(
            q.sql,
            "DELETE FROM \"user_liked_recipes\" WHERE \"user_id\" = ? AND \"recipe_id\" = ?"
        );
        assert_eq!(q.params, vec![BindValue::from("u1"), BindValue::from("r1")]);
    }

    #[test]
    fn increment_is_a_single_atomic_update() {
        let q = increment::<Recipe>("r1", "views", 1).unwrap();
        assert_eq!(
            q.sql,
            "UPDATE \"recipes\" SET \"views\" = \"views\" + ? WHERE \"id\" = ?"
        );
        assert_eq!(q.params, vec![BindValue::I64(1), BindValue::from("r1")]);
    }

    #[test]
    fn increment_only_touches_counter_columns() {
        assert!(matches!(increment::<Recipe>("r1", "name", 1), Err(AppError::Validation(_))));
        assert!(matches!(increment::<Recipe>("r1", "bogus", 1), Err(AppError::Validation(_))));
        assert!(matches!(increment::<Recipe>("", "views", 1), Err(AppError::Validation(_))));
    }

    #[test]
    fn checked_identifier_rejects_injection() {
        assert!(checked_identifier("ingredients_for_recipe").is_ok());
        assert!(checked_identifier("recipes; DROP TABLE users").is_err());
        assert!(checked_identifier("").is_err());
    }
}
