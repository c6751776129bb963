use clap::{Args, Subcommand};

use mealprep_core::{IngredientLoader, Recipe, RecipeCatalog, RecipeFilter, RecipeId, SortMode};

use super::OutputFormat;
use crate::catalog::CatalogSource;

#[derive(Args)]
pub struct RecipesCommand {
    #[command(subcommand)]
    pub command: RecipesSubcommand,
}

#[derive(Subcommand)]
pub enum RecipesSubcommand {
    /// List recipes in the catalog
    List {
        /// Only recipes whose title contains this text
        #[arg(long, short)]
        query: Option<String>,

        /// Only breakfast recipes
        #[arg(long)]
        breakfast: bool,

        /// Only vegetarian or vegan recipes
        #[arg(long)]
        vegetarian: bool,

        /// Only liked recipes
        #[arg(long)]
        liked: bool,

        /// Sort order (relevance, rating, recency)
        #[arg(long, short, default_value = "relevance")]
        sort: SortMode,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a recipe with its ingredients by department
    Show {
        /// Recipe ID
        id: RecipeId,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl RecipesCommand {
    pub async fn run(&self, catalog: CatalogSource) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            RecipesSubcommand::List {
                query,
                breakfast,
                vegetarian,
                liked,
                sort,
                format,
            } => {
                let recipes = catalog.list_all_recipes().await?;

                let mut filter = RecipeFilter::new()
                    .with_breakfast(*breakfast)
                    .with_vegetarian(*vegetarian)
                    .with_liked(*liked)
                    .with_sort(*sort);
                if let Some(q) = query {
                    filter = filter.with_query(q.clone());
                }
                let matching = filter.apply(&recipes);

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&matching)?);
                    }
                    OutputFormat::Text => {
                        if matching.is_empty() {
                            println!("No recipes found.");
                        } else {
                            print_recipe_table(&matching);
                        }
                    }
                }
                Ok(())
            }
            RecipesSubcommand::Show { id, format } => {
                let recipes = catalog.list_all_recipes().await?;
                let mut recipe = recipes
                    .into_iter()
                    .find(|r| r.id == *id)
                    .ok_or_else(|| format!("Recipe not found: {}", id))?;

                let loader = IngredientLoader::new(catalog);
                if let Some(groups) = loader.expand(*id).await? {
                    recipe.attach_departments(groups);
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&recipe)?);
                    }
                    OutputFormat::Text => {
                        print!("{}", recipe);
                    }
                }
                Ok(())
            }
        }
    }
}

fn print_recipe_table(recipes: &[&Recipe]) {
    println!("{:<6} {:<32} {:<7} {}", "ID", "TITLE", "RATING", "TAGS");
    println!("{}", "-".repeat(64));
    for recipe in recipes {
        let rating = recipe
            .rating
            .map(|r| format!("{:.1}", r))
            .unwrap_or_else(|| "-".to_string());
        let liked = if recipe.liked { " *" } else { "" };
        println!(
            "{:<6} {:<32} {:<7} {}{}",
            recipe.id,
            truncate(&recipe.title, 32),
            rating,
            recipe.tags.join(", "),
            liked
        );
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
