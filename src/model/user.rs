use crate::columns;
use crate::entity::{Entity, RelationRow, Row};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub status: String,
    pub created_at: String,
}

impl Row for User {
    const TABLE: &'static str = "users";

    columns! {
        id => Id,
        name => Data,
        email => Data,
        status => Data,
        created_at => CreatedAt,
    }
}

impl Entity for User {
    const SORTABLE: &'static [&'static str] = &["id", "name", "created_at"];

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct UserLikedRecipe {
    pub user_id: String,
    pub recipe_id: String,
}

impl Row for UserLikedRecipe {
    const TABLE: &'static str = "user_liked_recipes";

    columns! {
        user_id => Parent,
        recipe_id => Child,
    }
}

impl RelationRow for UserLikedRecipe {}
