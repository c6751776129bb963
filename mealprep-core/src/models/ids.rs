use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a recipe in the backend catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub u64);

/// Identifier of a catalog ingredient.
///
/// Unique per distinct ingredient across the whole catalog, not per recipe,
/// so two recipes using "lemon" share the same `IngredientId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientId(pub u64);

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for IngredientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecipeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(RecipeId)
            .map_err(|_| format!("Invalid recipe id '{}'. Expected a number.", s))
    }
}

impl FromStr for IngredientId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(IngredientId)
            .map_err(|_| format!("Invalid ingredient id '{}'. Expected a number.", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_id_from_str() {
        assert_eq!(RecipeId::from_str("42").unwrap(), RecipeId(42));
        assert_eq!(RecipeId::from_str(" 7 ").unwrap(), RecipeId(7));
        assert!(RecipeId::from_str("abc").is_err());
    }

    #[test]
    fn test_ingredient_id_from_str_invalid() {
        let err = IngredientId::from_str("-1").unwrap_err();
        assert!(err.contains("Invalid ingredient id"));
    }

    #[test]
    fn test_ids_serialize_as_numbers() {
        let json = serde_json::to_string(&RecipeId(3)).unwrap();
        assert_eq!(json, "3");

        let parsed: IngredientId = serde_json::from_str("11").unwrap();
        assert_eq!(parsed, IngredientId(11));
    }
}
