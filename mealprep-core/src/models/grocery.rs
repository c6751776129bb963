//! Consolidated grocery list for a weekly plan.
//!
//! A grocery list is a snapshot: every consolidation run builds a new one
//! and nothing edits an existing list in place. Items are grouped into
//! department sections, each ingredient living in exactly one section.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{IngredientId, RecipeId};

/// A contributing line whose unit differs from the item's unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MismatchedLine {
    pub recipe_title: String,
    pub quantity: f64,
    pub unit: String,
}

/// Attached to an item when its contributing lines disagree on the unit.
///
/// The item's quantity only sums lines in the item's own unit; the other
/// lines are kept here untouched for the consumer to display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnitMismatchWarning {
    /// Unit of the first line seen, used for the item's total
    pub unit: String,
    pub lines: Vec<MismatchedLine>,
}

impl UnitMismatchWarning {
    /// Distinct conflicting units, in the order they were seen.
    pub fn conflicting_units(&self) -> Vec<&str> {
        let mut units: Vec<&str> = Vec::new();
        for line in &self.lines {
            if !units.iter().any(|u| u.eq_ignore_ascii_case(&line.unit)) {
                units.push(&line.unit);
            }
        }
        units
    }
}

impl fmt::Display for UnitMismatchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let extra: Vec<String> = self
            .lines
            .iter()
            .map(|l| format!("{} {} ({})", format_quantity(l.quantity), l.unit, l.recipe_title))
            .collect();
        write!(
            f,
            "units differ from '{}', not added: {}",
            self.unit,
            extra.join(", ")
        )
    }
}

/// One consolidated ingredient of the grocery list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroceryListItem {
    pub ingredient_id: IngredientId,
    pub name: String,
    pub department: String,
    /// Sum over every contributing line in `unit`
    pub quantity: f64,
    pub unit: String,
    /// Titles of the recipes that use this ingredient (no duplicates)
    pub recipes: Vec<String>,
    pub recipe_ids: Vec<RecipeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_mismatch: Option<UnitMismatchWarning>,
}

impl GroceryListItem {
    pub fn has_unit_mismatch(&self) -> bool {
        self.unit_mismatch.is_some()
    }

    /// Arithmetic sum over all contributing lines, ignoring units.
    pub fn raw_total(&self) -> f64 {
        let extra: f64 = self
            .unit_mismatch
            .as_ref()
            .map(|w| w.lines.iter().map(|l| l.quantity).sum())
            .unwrap_or(0.0);
        self.quantity + extra
    }
}

impl fmt::Display for GroceryListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{:<25} {}", self.name, format_quantity(self.quantity))?;
        } else {
            write!(
                f,
                "{:<25} {} {}",
                self.name,
                format_quantity(self.quantity),
                self.unit
            )?;
        }
        if self.unit_mismatch.is_some() {
            write!(f, " (!)")?;
        }
        Ok(())
    }
}

/// All items of one department, in first-seen order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepartmentSection {
    pub name: String,
    pub items: Vec<GroceryListItem>,
}

/// A department-grouped grocery list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GroceryList {
    pub sections: Vec<DepartmentSection>,
}

impl GroceryList {
    pub fn new(sections: Vec<DepartmentSection>) -> Self {
        Self { sections }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.items.is_empty())
    }

    /// Total number of items across all departments.
    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    pub fn items(&self) -> impl Iterator<Item = &GroceryListItem> {
        self.sections.iter().flat_map(|s| s.items.iter())
    }

    pub fn find(&self, ingredient_id: IngredientId) -> Option<&GroceryListItem> {
        self.items().find(|i| i.ingredient_id == ingredient_id)
    }

    pub fn contains(&self, ingredient_id: IngredientId) -> bool {
        self.find(ingredient_id).is_some()
    }

    /// Items carrying a unit mismatch warning.
    pub fn warnings(&self) -> impl Iterator<Item = &GroceryListItem> {
        self.items().filter(|i| i.has_unit_mismatch())
    }

    /// Keep only the items matching `keep`, dropping departments left empty.
    pub fn filtered<F>(&self, mut keep: F) -> GroceryList
    where
        F: FnMut(&GroceryListItem) -> bool,
    {
        let sections = self
            .sections
            .iter()
            .filter_map(|section| {
                let items: Vec<GroceryListItem> =
                    section.items.iter().filter(|i| keep(i)).cloned().collect();
                if items.is_empty() {
                    None
                } else {
                    Some(DepartmentSection {
                        name: section.name.clone(),
                        items,
                    })
                }
            })
            .collect();
        GroceryList { sections }
    }
}

impl fmt::Display for GroceryList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, section) in self.sections.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", section.name)?;
            writeln!(f, "{}", "-".repeat(section.name.len().max(10)))?;
            for item in &section.items {
                writeln!(f, "  {}", item)?;
            }
        }
        Ok(())
    }
}

/// Format a quantity, removing unnecessary decimal places.
pub fn format_quantity(qty: f64) -> String {
    if qty.fract() == 0.0 {
        format!("{}", qty as i64)
    } else {
        let s = format!("{:.2}", qty);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, name: &str, qty: f64, unit: &str) -> GroceryListItem {
        GroceryListItem {
            ingredient_id: IngredientId(id),
            name: name.into(),
            department: "Produce".into(),
            quantity: qty,
            unit: unit.into(),
            recipes: vec!["Salad".into()],
            recipe_ids: vec![RecipeId(1)],
            unit_mismatch: None,
        }
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(2.0), "2");
        assert_eq!(format_quantity(1.5), "1.5");
        assert_eq!(format_quantity(0.25), "0.25");
        assert_eq!(format_quantity(1.0 / 3.0), "0.33");
    }

    #[test]
    fn test_raw_total_includes_mismatched_lines() {
        let mut chicken = item(1, "chicken", 1.0, "lb");
        assert_eq!(chicken.raw_total(), 1.0);

        chicken.unit_mismatch = Some(UnitMismatchWarning {
            unit: "lb".into(),
            lines: vec![MismatchedLine {
                recipe_title: "Curry".into(),
                quantity: 500.0,
                unit: "g".into(),
            }],
        });
        assert_eq!(chicken.quantity, 1.0);
        assert_eq!(chicken.raw_total(), 501.0);
    }

    #[test]
    fn test_conflicting_units_are_distinct() {
        let warning = UnitMismatchWarning {
            unit: "lb".into(),
            lines: vec![
                MismatchedLine {
                    recipe_title: "A".into(),
                    quantity: 1.0,
                    unit: "g".into(),
                },
                MismatchedLine {
                    recipe_title: "B".into(),
                    quantity: 2.0,
                    unit: "G".into(),
                },
                MismatchedLine {
                    recipe_title: "C".into(),
                    quantity: 1.0,
                    unit: "oz".into(),
                },
            ],
        };
        assert_eq!(warning.conflicting_units(), vec!["g", "oz"]);
        assert!(warning.to_string().contains("not added"));
    }

    #[test]
    fn test_filtered_drops_empty_sections() {
        let list = GroceryList::new(vec![
            DepartmentSection {
                name: "Produce".into(),
                items: vec![item(1, "lemon", 3.0, "ea"), item(2, "basil", 1.0, "bunch")],
            },
            DepartmentSection {
                name: "Dairy".into(),
                items: vec![item(3, "milk", 1.0, "l")],
            },
        ]);

        let filtered = list.filtered(|i| i.ingredient_id != IngredientId(3));
        assert_eq!(filtered.sections.len(), 1);
        assert_eq!(filtered.len(), 2);
        // Source list is untouched
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_find_and_display() {
        let list = GroceryList::new(vec![DepartmentSection {
            name: "Produce".into(),
            items: vec![item(1, "lemon", 3.0, "ea")],
        }]);

        assert!(list.contains(IngredientId(1)));
        assert!(!list.contains(IngredientId(2)));
        assert_eq!(list.find(IngredientId(1)).unwrap().name, "lemon");

        let output = format!("{}", list);
        assert!(output.contains("Produce"));
        assert!(output.contains("3 ea"));
    }

    #[test]
    fn test_empty_list() {
        let list = GroceryList::default();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
    }
}
