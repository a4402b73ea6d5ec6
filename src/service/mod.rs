//! CrudService: generic CRUD using safe SQL builder. RecipeService: counter-moving writes.

mod crud;
pub(crate) mod executor;
mod recipe;
pub use crud::CrudService;
pub use recipe::RecipeService;
