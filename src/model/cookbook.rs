use crate::columns;
use crate::entity::{Entity, RelationBatch, RelationRow, Row};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct Cookbook {
    pub id: String,
    pub name: String,
    pub description: String,
    pub likes: i64,
    pub user_id: String,
    pub created_at: String,
    #[sqlx(skip)]
    pub recipes: Vec<CookbookRecipe>,
}

impl Row for Cookbook {
    const TABLE: &'static str = "cookbooks";

    columns! {
        id => Id,
        name => Data,
        description => Data,
        likes => Counter,
        user_id => Data,
        created_at => CreatedAt,
    }
}

impl Entity for Cookbook {
    const SORTABLE: &'static [&'static str] = &["id", "name", "created_at", "likes"];

    fn id(&self) -> &str {
        &self.id
    }

    fn relations(&self) -> Vec<RelationBatch> {
        vec![RelationBatch::from_rows(&self.recipes)]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct CookbookRecipe {
    pub cookbook_id: String,
    pub recipe_id: String,
}

impl Row for CookbookRecipe {
    const TABLE: &'static str = "cookbook_recipes";

    columns! {
        cookbook_id => Parent,
        recipe_id => Child,
    }
}

impl RelationRow for CookbookRecipe {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct Comment {
    pub id: String,
    pub recipe_id: String,
    pub user_id: String,
    pub comment: String,
    pub created_at: String,
}

impl Row for Comment {
    const TABLE: &'static str = "comments";

    columns! {
        id => Id,
        recipe_id => Fixed,
        user_id => Fixed,
        comment => Data,
        created_at => CreatedAt,
    }
}

impl Entity for Comment {
    const SORTABLE: &'static [&'static str] = &["id", "created_at"];

    fn id(&self) -> &str {
        &self.id
    }
}
