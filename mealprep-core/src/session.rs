//! The planning session: plan buckets, the current grocery list and the
//! user's removals, owned in one place.

use rand::Rng;

use crate::catalog::IngredientResolver;
use crate::consolidation::Consolidator;
use crate::error::ConsolidationError;
use crate::models::{BucketKind, GroceryList, IngredientId, Recipe, RecipeId};
use crate::overlay::RemovalOverlay;
use crate::plan::{PlanState, SmartFillLimits};

/// The plan as it was when a grocery run started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroceryRequest {
    pub generation: u64,
    pub recipe_ids: Vec<RecipeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The new list replaced the previous one
    Applied,
    /// The plan changed while the run was in progress; result discarded
    Stale,
}

pub struct GrocerySession<R> {
    plan: PlanState,
    overlay: RemovalOverlay,
    list: GroceryList,
    consolidator: Consolidator<R>,
}

impl<R: IngredientResolver> GrocerySession<R> {
    pub fn new(resolver: R) -> Self {
        Self::from_parts(
            resolver,
            PlanState::new(),
            RemovalOverlay::new(),
            GroceryList::default(),
        )
    }

    /// Resume a session from previously stored state.
    pub fn from_parts(
        resolver: R,
        plan: PlanState,
        overlay: RemovalOverlay,
        list: GroceryList,
    ) -> Self {
        Self {
            plan,
            overlay,
            list,
            consolidator: Consolidator::new(resolver),
        }
    }

    pub fn into_parts(self) -> (PlanState, RemovalOverlay, GroceryList) {
        (self.plan, self.overlay, self.list)
    }

    pub fn plan(&self) -> &PlanState {
        &self.plan
    }

    pub fn overlay(&self) -> &RemovalOverlay {
        &self.overlay
    }

    pub fn resolver(&self) -> &R {
        self.consolidator.resolver()
    }

    /// The last generated list, removals included.
    pub fn grocery_list(&self) -> &GroceryList {
        &self.list
    }

    /// The last generated list with removed items hidden.
    pub fn visible_grocery_list(&self) -> GroceryList {
        self.overlay.apply(&self.list)
    }

    pub fn add_to_bucket(&mut self, kind: BucketKind, recipe_id: RecipeId) -> bool {
        self.plan.add_to_bucket(kind, recipe_id)
    }

    pub fn remove_from_bucket(&mut self, kind: BucketKind, recipe_id: RecipeId) -> bool {
        self.plan.remove_from_bucket(kind, recipe_id)
    }

    pub fn clear_buckets(&mut self) {
        self.plan.clear_buckets();
    }

    pub fn shuffle<G: Rng + ?Sized>(&mut self, kind: BucketKind, rng: &mut G) {
        self.plan.shuffle(kind, rng);
    }

    pub fn shuffle_all<G: Rng + ?Sized>(&mut self, rng: &mut G) {
        self.plan.shuffle_all(rng);
    }

    pub fn smart_fill<G: Rng + ?Sized>(
        &mut self,
        catalog: &[Recipe],
        limits: SmartFillLimits,
        rng: &mut G,
    ) {
        self.plan.smart_fill(catalog, limits, rng);
    }

    pub fn replace_plan(&mut self, breakfast: Vec<RecipeId>, main: Vec<RecipeId>) {
        self.plan.replace(breakfast, main);
    }

    pub fn remove_grocery_item(&mut self, ingredient_id: IngredientId) -> bool {
        let removed = self.overlay.remove(ingredient_id, &self.list);
        if removed {
            tracing::info!("Removed ingredient {} from grocery list", ingredient_id);
        } else {
            tracing::debug!("Ingredient {} is not on the grocery list", ingredient_id);
        }
        removed
    }

    pub fn restore_grocery_item(&mut self, ingredient_id: IngredientId) -> bool {
        self.overlay.restore(ingredient_id)
    }

    pub fn reset_removals(&mut self) {
        self.overlay.reset();
    }

    /// Capture the current plan for a grocery run.
    pub fn begin_generation(&self) -> GroceryRequest {
        GroceryRequest {
            generation: self.plan.generation(),
            recipe_ids: self.plan.recipe_ids(),
        }
    }

    /// Apply the result of a grocery run started with `request`.
    ///
    /// A result for an outdated plan is dropped. On error the previous list
    /// stays in place and the error is returned.
    pub fn complete_generation(
        &mut self,
        request: GroceryRequest,
        result: Result<GroceryList, ConsolidationError>,
    ) -> Result<GenerationOutcome, ConsolidationError> {
        if request.generation != self.plan.generation() {
            tracing::warn!(
                "Discarding grocery list for plan generation {} (current is {})",
                request.generation,
                self.plan.generation()
            );
            return Ok(GenerationOutcome::Stale);
        }

        let list = result?;
        self.overlay.reconcile(&list);
        self.list = list;
        tracing::info!("Grocery list updated ({} item(s))", self.list.len());
        Ok(GenerationOutcome::Applied)
    }

    /// Consolidate the current plan and store the new list.
    pub async fn generate_grocery_list(&mut self) -> Result<GenerationOutcome, ConsolidationError> {
        let request = self.begin_generation();
        let result = self.consolidator.consolidate(&request.recipe_ids).await;
        self.complete_generation(request, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntry, InMemoryCatalog};
    use crate::models::IngredientLine;

    const LEMON: IngredientId = IngredientId(100);
    const PASTA: IngredientId = IngredientId(101);

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new(vec![
            CatalogEntry::new(
                Recipe::new(RecipeId(1), "Lemon Pasta"),
                vec![
                    IngredientLine::new(LEMON, "lemon", 2.0, "ea").with_department("Produce"),
                    IngredientLine::new(PASTA, "spaghetti", 250.0, "g").with_department("Pantry"),
                ],
            ),
            CatalogEntry::new(
                Recipe::new(RecipeId(2), "Tomato Pasta"),
                vec![IngredientLine::new(PASTA, "spaghetti", 200.0, "g").with_department("Pantry")],
            ),
            CatalogEntry::new(
                Recipe::new(RecipeId(4), "Lemon Yogurt"),
                vec![IngredientLine::new(LEMON, "lemon", 1.0, "ea").with_department("Produce")],
            ),
            CatalogEntry::new(
                Recipe::new(RecipeId(5), "Lemon Chicken"),
                vec![IngredientLine::new(LEMON, "lemon", 3.0, "ea").with_department("Produce")],
            ),
        ])
    }

    fn lemon_plan() -> GrocerySession<InMemoryCatalog> {
        let mut session = GrocerySession::new(catalog());
        session.add_to_bucket(BucketKind::Breakfast, RecipeId(4));
        session.add_to_bucket(BucketKind::Main, RecipeId(1));
        session.add_to_bucket(BucketKind::Main, RecipeId(2));
        session
    }

    #[tokio::test]
    async fn test_lemon_scenario() {
        let mut session = lemon_plan();

        let outcome = session.generate_grocery_list().await.unwrap();
        assert_eq!(outcome, GenerationOutcome::Applied);

        let visible = session.visible_grocery_list();
        let lemon = visible.find(LEMON).unwrap();
        assert_eq!(lemon.quantity, 3.0);
        assert_eq!(lemon.unit, "ea");
        assert_eq!(lemon.recipes.len(), 2);
        assert!(lemon.recipes.contains(&"Lemon Pasta".to_string()));
        assert!(lemon.recipes.contains(&"Lemon Yogurt".to_string()));
        assert_eq!(visible.find(PASTA).unwrap().quantity, 450.0);

        // Remove lemon, then add another recipe that needs lemons
        assert!(session.remove_grocery_item(LEMON));
        assert!(!session.visible_grocery_list().contains(LEMON));

        session.add_to_bucket(BucketKind::Main, RecipeId(5));
        session.generate_grocery_list().await.unwrap();

        let lemon = session.visible_grocery_list().find(LEMON).cloned().unwrap();
        assert_eq!(lemon.quantity, 6.0);
    }

    #[tokio::test]
    async fn test_removal_sticks_across_identical_regeneration() {
        let mut session = lemon_plan();
        session.generate_grocery_list().await.unwrap();
        session.remove_grocery_item(LEMON);

        session.generate_grocery_list().await.unwrap();
        assert!(!session.visible_grocery_list().contains(LEMON));
        assert!(session.grocery_list().contains(LEMON));

        session.reset_removals();
        assert!(session.visible_grocery_list().contains(LEMON));
    }

    #[tokio::test]
    async fn test_removal_of_absent_item_is_noop() {
        let mut session = lemon_plan();
        session.generate_grocery_list().await.unwrap();

        assert!(!session.remove_grocery_item(IngredientId(999)));
        assert_eq!(session.visible_grocery_list(), *session.grocery_list());
    }

    #[tokio::test]
    async fn test_stale_result_is_discarded() {
        let mut session = lemon_plan();
        session.generate_grocery_list().await.unwrap();
        let previous = session.grocery_list().clone();

        let request = session.begin_generation();
        let result = Consolidator::new(catalog())
            .consolidate(&request.recipe_ids)
            .await;
        session.remove_from_bucket(BucketKind::Main, RecipeId(2));

        let outcome = session.complete_generation(request, result).unwrap();
        assert_eq!(outcome, GenerationOutcome::Stale);
        assert_eq!(*session.grocery_list(), previous);
    }

    #[tokio::test]
    async fn test_failed_generation_keeps_previous_list() {
        let mut session = lemon_plan();
        session.generate_grocery_list().await.unwrap();
        let previous = session.grocery_list().clone();

        session.add_to_bucket(BucketKind::Main, RecipeId(404));
        let err = session.generate_grocery_list().await.unwrap_err();

        assert_eq!(err.failed_recipe_ids(), vec![RecipeId(404)]);
        assert_eq!(*session.grocery_list(), previous);
    }

    #[tokio::test]
    async fn test_empty_plan_gives_empty_list() {
        let mut session = GrocerySession::new(catalog());
        session.generate_grocery_list().await.unwrap();
        assert!(session.visible_grocery_list().is_empty());
        assert_eq!(session.resolver().resolve_calls(), 0);
    }

    #[tokio::test]
    async fn test_parts_round_trip() {
        let mut session = lemon_plan();
        session.generate_grocery_list().await.unwrap();
        session.remove_grocery_item(PASTA);

        let (plan, overlay, list) = session.into_parts();
        let resumed = GrocerySession::from_parts(catalog(), plan, overlay, list);
        assert!(!resumed.visible_grocery_list().contains(PASTA));
        assert_eq!(resumed.plan().bucket(BucketKind::Main).len(), 2);
    }
}
