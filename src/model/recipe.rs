use crate::columns;
use crate::entity::{Entity, RelationBatch, RelationRow, Row};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub minutes: i64,
    pub description: String,
    pub likes: i64,
    pub comments: i64,
    pub views: i64,
    pub image: String,
    pub recipe_cuisine: String,
    pub user_id: String,
    pub created_at: String,
    /// Ingredients attached on create; stored in `ingredients_for_recipe`.
    #[sqlx(skip)]
    pub recipe_ingredients: Vec<RecipeIngredient>,
}

impl Row for Recipe {
    const TABLE: &'static str = "recipes";

    columns! {
        id => Id,
        name => Data,
        minutes => Data,
        description => Data,
        likes => Counter,
        comments => Counter,
        views => Counter,
        image => Data,
        recipe_cuisine => Data,
        user_id => Data,
        created_at => CreatedAt,
    }
}

impl Entity for Recipe {
    const SORTABLE: &'static [&'static str] =
        &["id", "name", "created_at", "likes", "minutes", "views"];

    fn id(&self) -> &str {
        &self.id
    }

    fn relations(&self) -> Vec<RelationBatch> {
        vec![RelationBatch::from_rows(&self.recipe_ingredients)]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
}

impl Row for Ingredient {
    const TABLE: &'static str = "ingredients";

    columns! {
        id => Id,
        name => Data,
    }
}

impl Entity for Ingredient {
    const SORTABLE: &'static [&'static str] = &["id", "name"];

    fn id(&self) -> &str {
        &self.id
    }
}

/// An ingredient used by a recipe, with the amount called for.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct RecipeIngredient {
    pub recipe_id: String,
    pub ingredient_id: String,
    pub amount: String,
}

impl Row for RecipeIngredient {
    const TABLE: &'static str = "ingredients_for_recipe";

    columns! {
        recipe_id => Parent,
        ingredient_id => Child,
        amount => Data,
    }
}

impl RelationRow for RecipeIngredient {}
