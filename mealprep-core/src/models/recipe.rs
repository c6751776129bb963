use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::RecipeId;
use super::ingredient::IngredientLine;

/// Tag that marks a recipe as a breakfast candidate.
pub const BREAKFAST_TAG: &str = "breakfast";

/// A single line inside a department group of one recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepartmentItem {
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
}

/// The ingredient lines of one recipe that are shopped in one department.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepartmentGroup {
    pub name: String,
    pub items: Vec<DepartmentItem>,
}

impl DepartmentGroup {
    /// Group a recipe's ingredient lines by department.
    ///
    /// Departments appear in the order they are first seen in `lines`.
    pub fn from_lines(lines: &[IngredientLine]) -> Vec<DepartmentGroup> {
        let mut groups: Vec<DepartmentGroup> = Vec::new();

        for line in lines {
            let dept = line.department_name();
            let item = DepartmentItem {
                name: line.name.clone(),
                quantity: line.quantity,
                unit: if line.unit.is_empty() {
                    None
                } else {
                    Some(line.unit.clone())
                },
            };

            match groups.iter_mut().find(|g| g.name == dept) {
                Some(group) => group.items.push(item),
                None => groups.push(DepartmentGroup {
                    name: dept.to_string(),
                    items: vec![item],
                }),
            }
        }

        groups
    }
}

/// A recipe as shown in the browser and the plan buckets.
///
/// Ingredients are not part of the catalog listing; they are attached
/// lazily (see [`crate::IngredientLoader`]) and never change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub rating: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub liked: bool,
    pub last_cooked_weeks_ago: Option<u32>,
    #[serde(default)]
    pub departments: Vec<DepartmentGroup>,
}

impl Recipe {
    pub fn new(id: RecipeId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            rating: None,
            tags: Vec::new(),
            liked: false,
            last_cooked_weeks_ago: None,
            departments: Vec::new(),
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Set the tags, dropping duplicates (tags are a set).
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags.clear();
        for tag in tags {
            if !self.has_tag(&tag) {
                self.tags.push(tag);
            }
        }
        self
    }

    pub fn with_liked(mut self, liked: bool) -> Self {
        self.liked = liked;
        self
    }

    pub fn with_last_cooked_weeks_ago(mut self, weeks: u32) -> Self {
        self.last_cooked_weeks_ago = Some(weeks);
        self
    }

    /// Check if the recipe carries a tag (case-insensitive).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn is_breakfast(&self) -> bool {
        self.has_tag(BREAKFAST_TAG)
    }

    pub fn ingredients_loaded(&self) -> bool {
        !self.departments.is_empty()
    }

    /// Attach resolved department groups.
    ///
    /// Returns false (and leaves the recipe untouched) if groups were
    /// already attached.
    pub fn attach_departments(&mut self, departments: Vec<DepartmentGroup>) -> bool {
        if self.ingredients_loaded() {
            return false;
        }
        self.departments = departments;
        true
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.len()))?;
        writeln!(f, "Id: {}", self.id)?;

        if let Some(rating) = self.rating {
            writeln!(f, "Rating: {:.1}", rating)?;
        }

        if !self.tags.is_empty() {
            writeln!(f, "Tags: {}", self.tags.join(", "))?;
        }

        if self.departments.is_empty() {
            writeln!(f, "\nNo ingredients listed.")?;
        } else {
            writeln!(f, "\nIngredients:")?;
            for dept in &self.departments {
                writeln!(f, "  {}", dept.name)?;
                for item in &dept.items {
                    match &item.unit {
                        Some(unit) => writeln!(f, "    - {} - {} {}", item.name, item.quantity, unit)?,
                        None => writeln!(f, "    - {} - {}", item.name, item.quantity)?,
                    }
                }
            }
        }

        Ok(())
    }
}

/// A recipe together with its ingredient lines, as produced by a resolver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedRecipe {
    pub id: RecipeId,
    pub title: String,
    pub lines: Vec<IngredientLine>,
}

impl ResolvedRecipe {
    pub fn new(id: RecipeId, title: impl Into<String>, lines: Vec<IngredientLine>) -> Self {
        Self {
            id,
            title: title.into(),
            lines,
        }
    }
}
