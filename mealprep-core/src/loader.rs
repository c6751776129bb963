//! Lazy per-recipe ingredient loading for the recipe detail view.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::catalog::IngredientResolver;
use crate::error::ResolutionError;
use crate::models::{DepartmentGroup, RecipeId};

#[derive(Debug, Default)]
struct LoaderState {
    loaded: HashMap<RecipeId, Vec<DepartmentGroup>>,
    in_flight: HashSet<RecipeId>,
}

fn lock(state: &Mutex<LoaderState>) -> MutexGuard<'_, LoaderState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the in-flight flag when the load ends, including when the
/// `expand` future is dropped before the request completes.
struct InFlight<'a> {
    state: &'a Mutex<LoaderState>,
    recipe_id: RecipeId,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.state).in_flight.remove(&self.recipe_id);
    }
}

/// Loads a recipe's ingredients at most once.
///
/// A second `expand` for a recipe whose load is still running returns
/// `Ok(None)` instead of issuing another request. The state lock is never
/// held across an await.
#[derive(Debug)]
pub struct IngredientLoader<R> {
    resolver: R,
    state: Mutex<LoaderState>,
}

impl<R: IngredientResolver> IngredientLoader<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            state: Mutex::new(LoaderState::default()),
        }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn is_loaded(&self, recipe_id: RecipeId) -> bool {
        lock(&self.state).loaded.contains_key(&recipe_id)
    }

    pub fn is_loading(&self, recipe_id: RecipeId) -> bool {
        lock(&self.state).in_flight.contains(&recipe_id)
    }

    /// Department groups for `recipe_id`, loading them on first use.
    pub async fn expand(
        &self,
        recipe_id: RecipeId,
    ) -> Result<Option<Vec<DepartmentGroup>>, ResolutionError> {
        let guard = {
            let mut state = lock(&self.state);
            if let Some(groups) = state.loaded.get(&recipe_id) {
                return Ok(Some(groups.clone()));
            }
            if !state.in_flight.insert(recipe_id) {
                tracing::debug!("Ingredients for recipe {} already loading", recipe_id);
                return Ok(None);
            }
            InFlight {
                state: &self.state,
                recipe_id,
            }
        };

        let result = self.resolver.resolve(recipe_id).await;
        drop(guard);

        match result {
            Ok(recipe) => {
                let groups = DepartmentGroup::from_lines(&recipe.lines);
                lock(&self.state).loaded.insert(recipe_id, groups.clone());
                tracing::debug!(
                    "Loaded {} department(s) for recipe {}",
                    groups.len(),
                    recipe_id
                );
                Ok(Some(groups))
            }
            Err(e) => {
                tracing::warn!("Failed to load ingredients: {}", e);
                Err(e)
            }
        }
    }
}
