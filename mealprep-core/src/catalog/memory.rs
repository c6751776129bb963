use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{IngredientResolver, RecipeCatalog};
use crate::error::{CatalogError, ResolutionError};
use crate::models::{IngredientLine, Recipe, RecipeId, ResolvedRecipe};

/// A recipe plus its ingredient lines, the unit of an offline catalog file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub recipe: Recipe,
    #[serde(default)]
    pub ingredients: Vec<IngredientLine>,
}

impl CatalogEntry {
    pub fn new(recipe: Recipe, ingredients: Vec<IngredientLine>) -> Self {
        Self {
            recipe,
            ingredients,
        }
    }
}

/// A catalog held entirely in memory.
///
/// Counts resolver calls so callers can check that duplicate requests were
/// not issued.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    entries: Vec<CatalogEntry>,
    unavailable: HashSet<RecipeId>,
    resolve_calls: AtomicUsize,
}

impl InMemoryCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries,
            unavailable: HashSet::new(),
            resolve_calls: AtomicUsize::new(0),
        }
    }

    /// Load a catalog from a JSON file holding an array of entries.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        let entries: Vec<CatalogEntry> = serde_json::from_str(&contents)
            .map_err(|e| CatalogError::InvalidData(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(
            "Loaded {} recipe(s) from catalog file {}",
            entries.len(),
            path.display()
        );
        Ok(Self::new(entries))
    }

    /// Make every later resolution of `recipe_id` fail with a network error.
    pub fn mark_unavailable(&mut self, recipe_id: RecipeId) {
        self.unavailable.insert(recipe_id);
    }

    /// Number of `resolve` calls served so far.
    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    fn lookup(&self, recipe_id: RecipeId) -> Result<ResolvedRecipe, ResolutionError> {
        if self.unavailable.contains(&recipe_id) {
            return Err(ResolutionError::Network {
                recipe_id,
                message: "catalog unavailable".to_string(),
            });
        }

        self.entries
            .iter()
            .find(|e| e.recipe.id == recipe_id)
            .map(|e| ResolvedRecipe::new(recipe_id, e.recipe.title.clone(), e.ingredients.clone()))
            .ok_or(ResolutionError::NotFound(recipe_id))
    }
}

impl IngredientResolver for InMemoryCatalog {
    fn resolve(
        &self,
        recipe_id: RecipeId,
    ) -> impl Future<Output = Result<ResolvedRecipe, ResolutionError>> + Send {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        let result = self.lookup(recipe_id);
        async move {
            // Yield once so concurrent callers interleave like a real fetch
            tokio::task::yield_now().await;
            result
        }
    }
}

impl RecipeCatalog for InMemoryCatalog {
    fn list_all_recipes(&self) -> impl Future<Output = Result<Vec<Recipe>, CatalogError>> + Send {
        let recipes: Vec<Recipe> = self
            .entries
            .iter()
            .map(|e| {
                let mut recipe = e.recipe.clone();
                recipe.departments.clear();
                recipe
            })
            .collect();
        async move { Ok(recipes) }
    }
}
