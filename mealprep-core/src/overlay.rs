//! User removals layered over a generated grocery list.
//!
//! Removing an item never touches the list itself; it only hides the item in
//! the visible view. Each removal remembers which recipes contributed to the
//! item when it was removed. After a regeneration the overlay is reconciled
//! against the new list:
//!
//! - same ingredient, same contributing recipes: stays hidden
//! - same ingredient, different contributing recipes: shown again, since the
//!   total the user dismissed no longer applies
//! - ingredient gone from the list: forgotten

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{GroceryList, GroceryListItem, IngredientId, RecipeId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalOverlay {
    removed: BTreeMap<IngredientId, Vec<RecipeId>>,
}

fn contributors(item: &GroceryListItem) -> Vec<RecipeId> {
    let mut ids = item.recipe_ids.clone();
    ids.sort();
    ids.dedup();
    ids
}

impl RemovalOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide an item of `list`.
    ///
    /// Returns false when the ingredient is not on the list; nothing is
    /// recorded in that case.
    pub fn remove(&mut self, ingredient_id: IngredientId, list: &GroceryList) -> bool {
        match list.find(ingredient_id) {
            Some(item) => {
                self.removed.insert(ingredient_id, contributors(item));
                true
            }
            None => false,
        }
    }

    /// Show a hidden item again. Returns true if it was hidden.
    pub fn restore(&mut self, ingredient_id: IngredientId) -> bool {
        self.removed.remove(&ingredient_id).is_some()
    }

    pub fn reset(&mut self) {
        self.removed.clear();
    }

    pub fn is_removed(&self, ingredient_id: IngredientId) -> bool {
        self.removed.contains_key(&ingredient_id)
    }

    pub fn len(&self) -> usize {
        self.removed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }

    pub fn removed_ids(&self) -> impl Iterator<Item = IngredientId> + '_ {
        self.removed.keys().copied()
    }

    /// Bring the overlay in line with a freshly generated list.
    pub fn reconcile(&mut self, list: &GroceryList) {
        let before = self.removed.len();
        self.removed.retain(|id, recipes| match list.find(*id) {
            Some(item) => contributors(item) == *recipes,
            None => false,
        });

        let dropped = before - self.removed.len();
        if dropped > 0 {
            tracing::debug!("Reconcile dropped {} removal(s)", dropped);
        }
    }

    /// The visible view of `list`: every item not hidden by this overlay.
    pub fn apply(&self, list: &GroceryList) -> GroceryList {
        list.filtered(|item| !self.is_removed(item.ingredient_id))
    }
}
