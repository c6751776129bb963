//! Error types for the mealprep core.

use thiserror::Error;

use crate::models::RecipeId;

/// Resolving one recipe's ingredients failed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolutionError {
    #[error("Recipe {0} not found")]
    NotFound(RecipeId),

    #[error("Network error while loading recipe {recipe_id}: {message}")]
    Network { recipe_id: RecipeId, message: String },

    #[error("Invalid response for recipe {recipe_id}: {message}")]
    InvalidResponse { recipe_id: RecipeId, message: String },
}

impl ResolutionError {
    /// The recipe whose resolution failed.
    pub fn recipe_id(&self) -> RecipeId {
        match self {
            ResolutionError::NotFound(id) => *id,
            ResolutionError::Network { recipe_id, .. } => *recipe_id,
            ResolutionError::InvalidResponse { recipe_id, .. } => *recipe_id,
        }
    }
}

/// A consolidation run could not produce a grocery list.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConsolidationError {
    #[error("Could not build grocery list ({}), retry", describe_failures(.failures))]
    Resolution { failures: Vec<ResolutionError> },
}

impl ConsolidationError {
    /// Ids of every recipe that failed to resolve, in input order.
    pub fn failed_recipe_ids(&self) -> Vec<RecipeId> {
        match self {
            ConsolidationError::Resolution { failures } => {
                failures.iter().map(ResolutionError::recipe_id).collect()
            }
        }
    }
}

fn describe_failures(failures: &[ResolutionError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Plan history operation errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HistoryError {
    #[error("No saved menu for '{0}'")]
    NotFound(String),
}

/// Listing the recipe catalog failed.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error - unable to reach recipe catalog: {0}")]
    Network(String),

    #[error("Recipe catalog returned status {0}")]
    Status(u16),

    #[error("Invalid catalog data: {0}")]
    InvalidData(String),

    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
}

/// An invalid planning week.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WeekError {
    #[error("Week end {end} is before its start {start}")]
    EndBeforeStart {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}
