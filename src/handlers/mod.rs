//! HTTP handlers: generic factories per row type and recipe counter endpoints.

pub mod generic;
pub mod recipe;
pub use generic::*;
