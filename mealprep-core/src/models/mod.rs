mod bucket;
mod grocery;
mod ids;
mod ingredient;
mod recipe;
mod saved_menu;

pub use bucket::{Bucket, BucketKind};
pub use grocery::{
    format_quantity, DepartmentSection, GroceryList, GroceryListItem, MismatchedLine,
    UnitMismatchWarning,
};
pub use ids::{IngredientId, RecipeId};
pub use ingredient::{same_unit, IngredientLine, OTHER_DEPARTMENT};
pub use recipe::{DepartmentGroup, DepartmentItem, Recipe, ResolvedRecipe, BREAKFAST_TAG};
pub use saved_menu::{slugify, SavedMenu};
