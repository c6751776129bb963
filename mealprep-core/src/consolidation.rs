//! Plan-to-grocery consolidation.
//!
//! Resolves every recipe of a plan, merges ingredient lines by ingredient
//! id into one item per ingredient and groups the items by department.
//!
//! Unit policy: the first line seen for an ingredient fixes its unit. Later
//! lines in the same unit (compared trimmed, case-insensitive) are summed.
//! Lines in another unit are not added; they are kept on the item's
//! [`UnitMismatchWarning`] instead. There is no unit conversion.

use futures::future::join_all;
use std::collections::{HashMap, HashSet};

use crate::catalog::IngredientResolver;
use crate::error::ConsolidationError;
use crate::models::{
    same_unit, DepartmentSection, GroceryList, GroceryListItem, IngredientId, IngredientLine,
    MismatchedLine, RecipeId, ResolvedRecipe, UnitMismatchWarning,
};

/// Builds grocery lists from recipe ids.
#[derive(Debug)]
pub struct Consolidator<R> {
    resolver: R,
}

impl<R: IngredientResolver> Consolidator<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Consolidate the ingredients of `recipe_ids` into a grocery list.
    ///
    /// Ids are treated as a set (first occurrence wins for ordering). All
    /// recipes are resolved concurrently and the call waits for every one
    /// of them. If any resolution fails, no list is produced and the error
    /// names every failed recipe.
    pub async fn consolidate(
        &self,
        recipe_ids: &[RecipeId],
    ) -> Result<GroceryList, ConsolidationError> {
        let ids = dedupe(recipe_ids);
        if ids.is_empty() {
            return Ok(GroceryList::default());
        }

        tracing::debug!("Consolidating {} recipe(s)", ids.len());

        let results = join_all(ids.iter().map(|id| self.resolver.resolve(*id))).await;

        let mut recipes = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(recipe) => recipes.push(recipe),
                Err(e) => failures.push(e),
            }
        }

        if !failures.is_empty() {
            tracing::warn!(
                "Consolidation failed: {} of {} recipe(s) could not be resolved",
                failures.len(),
                ids.len()
            );
            return Err(ConsolidationError::Resolution { failures });
        }

        let list = merge(&recipes);
        tracing::debug!(
            "Consolidated {} item(s) in {} department(s)",
            list.len(),
            list.sections.len()
        );
        Ok(list)
    }
}

/// Merge resolved recipes into a department-grouped list.
///
/// Deterministic for a given recipe order: departments and items keep the
/// order in which they are first seen.
pub fn merge(recipes: &[ResolvedRecipe]) -> GroceryList {
    let mut acc = Accumulator::default();
    for recipe in recipes {
        for line in &recipe.lines {
            acc.add(recipe, line);
        }
    }
    acc.finish()
}

fn dedupe(recipe_ids: &[RecipeId]) -> Vec<RecipeId> {
    let mut seen = HashSet::new();
    recipe_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Running total for one ingredient.
struct Entry {
    item: GroceryListItem,
    mismatched: Vec<MismatchedLine>,
}

/// Per-call accumulator, dropped once the list is built.
#[derive(Default)]
struct Accumulator {
    entries: Vec<Entry>,
    index: HashMap<IngredientId, usize>,
}

impl Accumulator {
    fn add(&mut self, recipe: &ResolvedRecipe, line: &IngredientLine) {
        let Some(&idx) = self.index.get(&line.ingredient_id) else {
            self.index.insert(line.ingredient_id, self.entries.len());
            self.entries.push(Entry {
                item: GroceryListItem {
                    ingredient_id: line.ingredient_id,
                    name: line.name.clone(),
                    department: line.department_name().to_string(),
                    quantity: line.quantity,
                    unit: line.unit.trim().to_string(),
                    recipes: vec![recipe.title.clone()],
                    recipe_ids: vec![recipe.id],
                    unit_mismatch: None,
                },
                mismatched: Vec::new(),
            });
            return;
        };

        let entry = &mut self.entries[idx];
        if same_unit(&entry.item.unit, &line.unit) {
            entry.item.quantity += line.quantity;
        } else {
            entry.mismatched.push(MismatchedLine {
                recipe_title: recipe.title.clone(),
                quantity: line.quantity,
                unit: line.unit.trim().to_string(),
            });
        }

        if !entry.item.recipe_ids.contains(&recipe.id) {
            entry.item.recipe_ids.push(recipe.id);
        }
        if !entry.item.recipes.contains(&recipe.title) {
            entry.item.recipes.push(recipe.title.clone());
        }
    }

    fn finish(self) -> GroceryList {
        let mut sections: Vec<DepartmentSection> = Vec::new();

        for entry in self.entries {
            let mut item = entry.item;
            if !entry.mismatched.is_empty() {
                tracing::debug!(
                    "Unit mismatch for ingredient {} ({})",
                    item.ingredient_id,
                    item.name
                );
                item.unit_mismatch = Some(UnitMismatchWarning {
                    unit: item.unit.clone(),
                    lines: entry.mismatched,
                });
            }

            match sections.iter_mut().find(|s| s.name == item.department) {
                Some(section) => section.items.push(item),
                None => sections.push(DepartmentSection {
                    name: item.department.clone(),
                    items: vec![item],
                }),
            }
        }

        GroceryList::new(sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntry, InMemoryCatalog};
    use crate::error::ResolutionError;
    use crate::models::Recipe;

    const LEMON: IngredientId = IngredientId(100);
    const PASTA: IngredientId = IngredientId(101);
    const EGGS: IngredientId = IngredientId(102);
    const SALT: IngredientId = IngredientId(103);

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new(vec![
            CatalogEntry::new(
                Recipe::new(RecipeId(1), "Lemon Pasta"),
                vec![
                    IngredientLine::new(LEMON, "lemon", 2.0, "ea").with_department("Produce"),
                    IngredientLine::new(PASTA, "spaghetti", 250.0, "g").with_department("Pantry"),
                    IngredientLine::new(SALT, "salt", 1.0, "tsp"),
                ],
            ),
            CatalogEntry::new(
                Recipe::new(RecipeId(2), "Carbonara"),
                vec![
                    IngredientLine::new(PASTA, "spaghetti", 200.0, "g").with_department("Pantry"),
                    IngredientLine::new(EGGS, "eggs", 3.0, "").with_department("Dairy"),
                ],
            ),
            CatalogEntry::new(
                Recipe::new(RecipeId(4), "Lemon Curd Toast"),
                vec![
                    IngredientLine::new(EGGS, "eggs", 2.0, "").with_department("Dairy"),
                    IngredientLine::new(LEMON, "lemon", 1.0, "ea").with_department("Produce"),
                ],
            ),
            CatalogEntry::new(
                Recipe::new(RecipeId(5), "Pasta Bake"),
                vec![IngredientLine::new(PASTA, "spaghetti", 1.0, "lb").with_department("Pantry")],
            ),
        ])
    }

    fn quantity_of(list: &GroceryList, id: IngredientId) -> f64 {
        list.find(id).map(|i| i.quantity).unwrap_or(0.0)
    }

    #[tokio::test]
    async fn test_consolidate_empty() {
        let consolidator = Consolidator::new(catalog());
        let list = consolidator.consolidate(&[]).await.unwrap();
        assert!(list.is_empty());
        assert_eq!(consolidator.resolver().resolve_calls(), 0);
    }

    #[tokio::test]
    async fn test_sums_quantities_by_ingredient_id() {
        let consolidator = Consolidator::new(catalog());
        let list = consolidator
            .consolidate(&[RecipeId(1), RecipeId(2), RecipeId(4)])
            .await
            .unwrap();

        assert_eq!(quantity_of(&list, LEMON), 3.0);
        assert_eq!(quantity_of(&list, PASTA), 450.0);
        assert_eq!(quantity_of(&list, EGGS), 5.0);
        assert_eq!(quantity_of(&list, SALT), 1.0);
        assert_eq!(list.len(), 4);
    }

    #[tokio::test]
    async fn test_order_of_ids_does_not_change_totals() {
        let consolidator = Consolidator::new(catalog());
        let forward = consolidator
            .consolidate(&[RecipeId(1), RecipeId(2), RecipeId(4)])
            .await
            .unwrap();
        let backward = consolidator
            .consolidate(&[RecipeId(4), RecipeId(2), RecipeId(1)])
            .await
            .unwrap();

        for item in forward.items() {
            assert_eq!(item.quantity, quantity_of(&backward, item.ingredient_id));
        }
        assert_eq!(forward.len(), backward.len());
    }

    #[tokio::test]
    async fn test_duplicate_ids_resolve_once() {
        let consolidator = Consolidator::new(catalog());
        let list = consolidator
            .consolidate(&[RecipeId(1), RecipeId(1), RecipeId(4)])
            .await
            .unwrap();

        assert_eq!(consolidator.resolver().resolve_calls(), 2);
        assert_eq!(quantity_of(&list, LEMON), 3.0);
    }

    #[tokio::test]
    async fn test_contributing_recipes_are_attached() {
        let consolidator = Consolidator::new(catalog());
        let list = consolidator
            .consolidate(&[RecipeId(1), RecipeId(2), RecipeId(4)])
            .await
            .unwrap();

        let lemon = list.find(LEMON).unwrap();
        assert_eq!(lemon.recipes, vec!["Lemon Pasta", "Lemon Curd Toast"]);
        assert_eq!(lemon.recipe_ids, vec![RecipeId(1), RecipeId(4)]);
    }

    #[tokio::test]
    async fn test_departments_in_first_seen_order() {
        let consolidator = Consolidator::new(catalog());
        let list = consolidator
            .consolidate(&[RecipeId(1), RecipeId(2)])
            .await
            .unwrap();

        let names: Vec<&str> = list.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Produce", "Pantry", "Other", "Dairy"]);

        // Pure partition: every item appears in exactly one section
        let total: usize = list.sections.iter().map(|s| s.items.len()).sum();
        assert_eq!(total, 4);
        for section in &list.sections {
            assert!(section.items.iter().all(|i| i.department == section.name));
        }
    }

    #[tokio::test]
    async fn test_unit_mismatch_is_flagged_not_summed() {
        let consolidator = Consolidator::new(catalog());
        let list = consolidator
            .consolidate(&[RecipeId(1), RecipeId(5)])
            .await
            .unwrap();

        let pasta = list.find(PASTA).unwrap();
        assert_eq!(pasta.unit, "g");
        assert_eq!(pasta.quantity, 250.0);
        assert_eq!(pasta.raw_total(), 251.0);

        let warning = pasta.unit_mismatch.as_ref().unwrap();
        assert_eq!(warning.unit, "g");
        assert_eq!(warning.conflicting_units(), vec!["lb"]);
        assert_eq!(warning.lines[0].recipe_title, "Pasta Bake");
        assert_eq!(list.warnings().count(), 1);
    }

    #[tokio::test]
    async fn test_consolidate_is_idempotent() {
        let consolidator = Consolidator::new(catalog());
        let ids = [RecipeId(2), RecipeId(1), RecipeId(4)];
        let first = consolidator.consolidate(&ids).await.unwrap();
        let second = consolidator.consolidate(&ids).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_failure_reports_every_failed_recipe() {
        let mut catalog = catalog();
        catalog.mark_unavailable(RecipeId(2));
        let consolidator = Consolidator::new(catalog);

        let err = consolidator
            .consolidate(&[RecipeId(1), RecipeId(2), RecipeId(77)])
            .await
            .unwrap_err();

        assert_eq!(err.failed_recipe_ids(), vec![RecipeId(2), RecipeId(77)]);
        let ConsolidationError::Resolution { failures } = err;
        assert!(matches!(failures[0], ResolutionError::Network { .. }));
        assert_eq!(failures[1], ResolutionError::NotFound(RecipeId(77)));
    }

    #[test]
    fn test_merge_same_unit_case_insensitive() {
        let recipes = vec![
            ResolvedRecipe::new(
                RecipeId(1),
                "A",
                vec![IngredientLine::new(LEMON, "Lemon", 1.0, "EA")],
            ),
            ResolvedRecipe::new(
                RecipeId(2),
                "B",
                vec![IngredientLine::new(LEMON, "lemon", 2.0, " ea")],
            ),
        ];

        let list = merge(&recipes);
        let lemon = list.find(LEMON).unwrap();
        assert_eq!(lemon.quantity, 3.0);
        assert_eq!(lemon.name, "Lemon");
        assert_eq!(lemon.unit, "EA");
        assert!(!lemon.has_unit_mismatch());
    }

    #[test]
    fn test_merge_keeps_same_named_ingredients_apart() {
        let recipes = vec![ResolvedRecipe::new(
            RecipeId(1),
            "Two Onions",
            vec![
                IngredientLine::new(IngredientId(1), "onion", 1.0, "ea"),
                IngredientLine::new(IngredientId(2), "onion", 2.0, "ea"),
            ],
        )];

        let list = merge(&recipes);
        assert_eq!(list.len(), 2);
    }
}
