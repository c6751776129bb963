//! Mealprep Core Library
//!
//! Weekly meal planning: plan buckets, grocery list consolidation, removals,
//! saved menus and the recipe catalog clients they depend on.

pub mod browse;
pub mod catalog;
pub mod consolidation;
pub mod error;
pub mod history;
pub mod loader;
pub mod models;
pub mod overlay;
pub mod plan;
pub mod session;
pub mod week;

pub use browse::{RecipeFilter, SortMode};
pub use catalog::{CatalogEntry, HttpCatalog, InMemoryCatalog, IngredientResolver, RecipeCatalog};
pub use consolidation::Consolidator;
pub use error::{CatalogError, ConsolidationError, HistoryError, ResolutionError, WeekError};
pub use history::{PlanHistory, DEFAULT_SHARE_BASE_URL};
pub use loader::IngredientLoader;
pub use models::{
    format_quantity, Bucket, BucketKind, DepartmentGroup, GroceryList, GroceryListItem,
    IngredientId, IngredientLine, Recipe, RecipeId, ResolvedRecipe, SavedMenu,
    UnitMismatchWarning,
};
pub use overlay::RemovalOverlay;
pub use plan::{PlanSnapshot, PlanState, SmartFillLimits};
pub use session::{GenerationOutcome, GroceryRequest, GrocerySession};
pub use week::WeekRange;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
