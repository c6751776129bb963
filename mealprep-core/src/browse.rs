//! Filtering and sorting of the recipe catalog.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::models::Recipe;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Catalog order
    #[default]
    Relevance,
    /// Highest rating first, unrated last
    Rating,
    /// Most recently cooked first, never cooked last
    Recency,
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMode::Relevance => write!(f, "relevance"),
            SortMode::Rating => write!(f, "rating"),
            SortMode::Recency => write!(f, "recency"),
        }
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "relevance" => Ok(SortMode::Relevance),
            "rating" => Ok(SortMode::Rating),
            "recency" | "recent" => Ok(SortMode::Recency),
            _ => Err(format!(
                "Invalid sort mode '{}'. Valid options: relevance, rating, recency",
                s
            )),
        }
    }
}

/// Browser view settings. Applying a filter never changes the catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeFilter {
    pub query: Option<String>,
    pub breakfast: bool,
    pub vegetarian: bool,
    pub liked: bool,
    pub sort: SortMode,
}

impl RecipeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = if query.trim().is_empty() {
            None
        } else {
            Some(query)
        };
        self
    }

    pub fn with_breakfast(mut self, breakfast: bool) -> Self {
        self.breakfast = breakfast;
        self
    }

    pub fn with_vegetarian(mut self, vegetarian: bool) -> Self {
        self.vegetarian = vegetarian;
        self
    }

    pub fn with_liked(mut self, liked: bool) -> Self {
        self.liked = liked;
        self
    }

    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        if let Some(query) = &self.query {
            let needle = query.trim().to_lowercase();
            if !recipe.title.to_lowercase().contains(&needle) {
                return false;
            }
        }
        if self.breakfast && !recipe.is_breakfast() {
            return false;
        }
        if self.vegetarian && !(recipe.has_tag("vegetarian") || recipe.has_tag("vegan")) {
            return false;
        }
        if self.liked && !recipe.liked {
            return false;
        }
        true
    }

    /// Matching recipes in display order.
    pub fn apply<'a>(&self, recipes: &'a [Recipe]) -> Vec<&'a Recipe> {
        let mut matching: Vec<&Recipe> = recipes.iter().filter(|r| self.matches(r)).collect();

        match self.sort {
            SortMode::Relevance => {}
            SortMode::Rating => matching.sort_by(|a, b| match (a.rating, b.rating) {
                (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }),
            SortMode::Recency => matching.sort_by(|a, b| {
                match (a.last_cooked_weeks_ago, b.last_cooked_weeks_ago) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            }),
        }

        matching
    }
}
