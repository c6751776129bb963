//! CLI state persisted between invocations.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use mealprep_core::{GroceryList, PlanState, RemovalOverlay, SavedMenu, WeekRange};

const STATE_FILE: &str = "state.json";

/// Everything the CLI remembers between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub plan: PlanState,
    pub removals: RemovalOverlay,
    pub grocery_list: GroceryList,
    pub saved_menus: Vec<SavedMenu>,
    pub week: Option<WeekRange>,
}

/// Reads and writes `state.json` in the data directory.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(STATE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored state, or a fresh one if nothing was saved yet.
    pub fn load(&self) -> Result<AppState, StorageError> {
        if !self.path.exists() {
            tracing::debug!("No state file at {}, starting fresh", self.path.display());
            return Ok(AppState::default());
        }
        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| StorageError::ReadError(self.path.clone(), e))?;
        serde_json::from_str(&contents).map_err(|e| StorageError::ParseError(self.path.clone(), e))
    }

    pub fn save(&self, state: &AppState) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| StorageError::WriteError(self.path.clone(), e))?;
        }
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| StorageError::ParseError(self.path.clone(), e))?;
        std::fs::write(&self.path, json)
            .map_err(|e| StorageError::WriteError(self.path.clone(), e))?;
        tracing::debug!("Saved state to {}", self.path.display());
        Ok(())
    }
}

#[derive(Debug)]
pub enum StorageError {
    ReadError(PathBuf, std::io::Error),
    WriteError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::ReadError(path, e) => {
                write!(f, "Failed to read state file '{}': {}", path.display(), e)
            }
            StorageError::WriteError(path, e) => {
                write!(f, "Failed to write state file '{}': {}", path.display(), e)
            }
            StorageError::ParseError(path, e) => {
                write!(f, "Invalid state file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for StorageError {}
