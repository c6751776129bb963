//! Recipe catalog collaborators.
//!
//! The core never fetches data itself; it talks to the catalog through two
//! small traits. [`HttpCatalog`] talks to the recipe backend,
//! [`InMemoryCatalog`] serves a fixed set of recipes (offline catalog files
//! and tests).

mod http;
mod memory;

use std::future::Future;

use crate::error::{CatalogError, ResolutionError};
use crate::models::{Recipe, RecipeId, ResolvedRecipe};

pub use http::HttpCatalog;
pub use memory::{CatalogEntry, InMemoryCatalog};

/// Resolves a recipe id into its ingredient lines.
///
/// Implementations are not expected to cache; callers dedupe ids.
pub trait IngredientResolver {
    fn resolve(
        &self,
        recipe_id: RecipeId,
    ) -> impl Future<Output = Result<ResolvedRecipe, ResolutionError>> + Send;
}

/// Lists every recipe available for planning.
pub trait RecipeCatalog {
    fn list_all_recipes(&self) -> impl Future<Output = Result<Vec<Recipe>, CatalogError>> + Send;
}
