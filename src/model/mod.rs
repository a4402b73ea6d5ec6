//! Persisted row types for the recipe domain.

mod cookbook;
mod recipe;
mod user;

pub use cookbook::{Comment, Cookbook, CookbookRecipe};
pub use recipe::{Ingredient, Recipe, RecipeIngredient};
pub use user::{User, UserLikedRecipe};
