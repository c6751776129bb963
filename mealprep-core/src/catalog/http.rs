//! HTTP client for the recipe backend.
//!
//! Endpoints used:
//! - `GET /recipes` lists the catalog
//! - `GET /recipes/{id}?include_ingredients=true` returns one recipe with
//!   its ingredient lines

use serde::Deserialize;
use std::time::Duration;

use super::{IngredientResolver, RecipeCatalog};
use crate::error::{CatalogError, ResolutionError};
use crate::models::{IngredientId, IngredientLine, Recipe, RecipeId, ResolvedRecipe};

/// Recipe as listed by the backend.
#[derive(Debug, Deserialize)]
struct ApiRecipe {
    id: u64,
    name: String,
    #[serde(default)]
    tags: Vec<String>,
    rating: Option<f64>,
    #[serde(default)]
    liked: bool,
    last_cooked_weeks_ago: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiIngredient {
    name: String,
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiRecipeIngredient {
    ingredient_id: u64,
    quantity: f64,
    #[serde(default)]
    unit: String,
    ingredient: ApiIngredient,
}

#[derive(Debug, Deserialize)]
struct ApiRecipeWithIngredients {
    id: u64,
    name: String,
    #[serde(default)]
    ingredients: Vec<ApiRecipeIngredient>,
}

impl From<ApiRecipe> for Recipe {
    fn from(api: ApiRecipe) -> Self {
        let mut recipe = Recipe::new(RecipeId(api.id), api.name).with_tags(api.tags);
        recipe.rating = api.rating;
        recipe.liked = api.liked;
        recipe.last_cooked_weeks_ago = api.last_cooked_weeks_ago;
        recipe
    }
}

impl From<ApiRecipeIngredient> for IngredientLine {
    fn from(api: ApiRecipeIngredient) -> Self {
        IngredientLine {
            ingredient_id: IngredientId(api.ingredient_id),
            name: api.ingredient.name,
            quantity: api.quantity,
            unit: api.unit,
            department: api.ingredient.category,
        }
    }
}

/// Recipe catalog backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    base_url: String,
    api_token: Option<String>,
    client: reqwest::Client,
}

impl HttpCatalog {
    /// Creates a catalog client. `timeout` bounds every request.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: None,
            client,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(format!("{}{}", self.base_url, path));
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl IngredientResolver for HttpCatalog {
    async fn resolve(&self, recipe_id: RecipeId) -> Result<ResolvedRecipe, ResolutionError> {
        tracing::debug!("Fetching ingredients for recipe {}", recipe_id);

        let response = self
            .get(&format!("/recipes/{}", recipe_id))
            .query(&[("include_ingredients", "true")])
            .send()
            .await
            .map_err(|e| ResolutionError::Network {
                recipe_id,
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ResolutionError::NotFound(recipe_id));
        }
        if !status.is_success() {
            return Err(ResolutionError::Network {
                recipe_id,
                message: format!("Server returned status {}", status),
            });
        }

        let recipe: ApiRecipeWithIngredients =
            response
                .json()
                .await
                .map_err(|e| ResolutionError::InvalidResponse {
                    recipe_id,
                    message: e.to_string(),
                })?;

        if recipe.id != recipe_id.0 {
            return Err(ResolutionError::InvalidResponse {
                recipe_id,
                message: format!("backend answered with recipe {}", recipe.id),
            });
        }

        Ok(ResolvedRecipe::new(
            recipe_id,
            recipe.name,
            recipe.ingredients.into_iter().map(Into::into).collect(),
        ))
    }
}

impl RecipeCatalog for HttpCatalog {
    async fn list_all_recipes(&self) -> Result<Vec<Recipe>, CatalogError> {
        let response = self
            .get("/recipes")
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status().as_u16()));
        }

        let recipes: Vec<ApiRecipe> = response
            .json()
            .await
            .map_err(|e| CatalogError::InvalidData(e.to_string()))?;

        tracing::debug!("Catalog listed {} recipe(s)", recipes.len());
        Ok(recipes.into_iter().map(Into::into).collect())
    }
}
