use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::IngredientId;

/// Department used for ingredients whose catalog entry has no category.
pub const OTHER_DEPARTMENT: &str = "Other";

/// One ingredient line of a recipe, as returned by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientLine {
    pub ingredient_id: IngredientId,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    /// Shopping department (the ingredient's catalog category)
    pub department: Option<String>,
}

impl IngredientLine {
    pub fn new(
        ingredient_id: IngredientId,
        name: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            ingredient_id,
            name: name.into(),
            quantity,
            unit: unit.into(),
            department: None,
        }
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// The department this line is shopped in, falling back to "Other"
    /// when the category is missing or blank.
    pub fn department_name(&self) -> &str {
        match self.department.as_deref().map(str::trim) {
            Some(dept) if !dept.is_empty() => dept,
            _ => OTHER_DEPARTMENT,
        }
    }
}

impl fmt::Display for IngredientLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{} {}", self.quantity, self.name)
        } else {
            write!(f, "{} {} {}", self.quantity, self.unit, self.name)
        }
    }
}

/// Compare two units the way consolidation does: trimmed, case-insensitive.
pub fn same_unit(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
