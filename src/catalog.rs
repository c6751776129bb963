use std::time::Duration;

use mealprep_core::{
    CatalogError, HttpCatalog, InMemoryCatalog, IngredientResolver, Recipe, RecipeCatalog,
    RecipeId, ResolutionError, ResolvedRecipe,
};

use crate::config::Config;

/// The catalog selected by the configuration.
pub enum CatalogSource {
    Http(HttpCatalog),
    File(InMemoryCatalog),
}

impl CatalogSource {
    /// Offline catalog file when configured, the recipe backend otherwise.
    pub fn from_config(config: &Config) -> Result<Self, CatalogError> {
        if let Some(file) = &config.catalog_file {
            tracing::debug!("Using catalog file {}", file.value.display());
            return Ok(CatalogSource::File(InMemoryCatalog::from_path(&file.value)?));
        }

        let timeout = Duration::from_secs(config.request_timeout_secs.value);
        let mut catalog = HttpCatalog::new(config.api_base_url.value.clone(), timeout)?;
        if let Some(token) = &config.api_token {
            catalog = catalog.with_token(token.value.clone());
        }
        tracing::debug!("Using recipe backend {}", catalog.base_url());
        Ok(CatalogSource::Http(catalog))
    }
}

impl IngredientResolver for CatalogSource {
    async fn resolve(&self, recipe_id: RecipeId) -> Result<ResolvedRecipe, ResolutionError> {
        match self {
            CatalogSource::Http(catalog) => catalog.resolve(recipe_id).await,
            CatalogSource::File(catalog) => catalog.resolve(recipe_id).await,
        }
    }
}

impl RecipeCatalog for CatalogSource {
    async fn list_all_recipes(&self) -> Result<Vec<Recipe>, CatalogError> {
        match self {
            CatalogSource::Http(catalog) => catalog.list_all_recipes().await,
            CatalogSource::File(catalog) => catalog.list_all_recipes().await,
        }
    }
}
