use clap::{Args, Subcommand};
use std::collections::HashMap;

use mealprep_core::{BucketKind, PlanState, RecipeCatalog, RecipeId};

use super::OutputFormat;
use crate::catalog::CatalogSource;
use crate::config::Config;
use crate::store::AppState;

#[derive(Args)]
pub struct PlanCommand {
    #[command(subcommand)]
    pub command: PlanSubcommand,
}

#[derive(Subcommand)]
pub enum PlanSubcommand {
    /// Show both plan buckets
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a recipe to a bucket
    Add {
        /// Bucket (breakfast, main)
        bucket: BucketKind,

        /// Recipe ID
        id: RecipeId,
    },

    /// Remove a recipe from a bucket
    Remove {
        /// Bucket (breakfast, main)
        bucket: BucketKind,

        /// Recipe ID
        id: RecipeId,
    },

    /// Empty both buckets
    Clear,

    /// Shuffle one bucket, or both when none is given
    Shuffle {
        /// Bucket (breakfast, main)
        bucket: Option<BucketKind>,
    },

    /// Replace both buckets with a random pick from the catalog
    Fill,
}

impl PlanCommand {
    pub async fn run(
        &self,
        state: &mut AppState,
        catalog: &CatalogSource,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            PlanSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        let snapshot = state.plan.snapshot();
                        let output = serde_json::json!({
                            "breakfast": snapshot.breakfast,
                            "main": snapshot.main,
                        });
                        println!("{}", serde_json::to_string_pretty(&output)?);
                    }
                    OutputFormat::Text => {
                        let titles = recipe_titles(catalog).await;
                        print_plan(&state.plan, &titles);
                    }
                }
                Ok(())
            }
            PlanSubcommand::Add { bucket, id } => {
                if state.plan.add_to_bucket(*bucket, *id) {
                    println!("Added recipe {} to {}", id, bucket.heading());
                } else {
                    println!("Recipe {} is already in {}", id, bucket.heading());
                }
                Ok(())
            }
            PlanSubcommand::Remove { bucket, id } => {
                if state.plan.remove_from_bucket(*bucket, *id) {
                    println!("Removed recipe {} from {}", id, bucket.heading());
                } else {
                    println!("Recipe {} is not in {}", id, bucket.heading());
                }
                Ok(())
            }
            PlanSubcommand::Clear => {
                state.plan.clear_buckets();
                println!("Cleared both buckets");
                Ok(())
            }
            PlanSubcommand::Shuffle { bucket } => {
                match bucket {
                    Some(kind) => state.plan.shuffle(*kind, &mut rand::rng()),
                    None => state.plan.shuffle_all(&mut rand::rng()),
                }
                let titles = recipe_titles(catalog).await;
                print_plan(&state.plan, &titles);
                Ok(())
            }
            PlanSubcommand::Fill => {
                let recipes = catalog.list_all_recipes().await?;
                if recipes.is_empty() {
                    return Err("Recipe catalog is empty, nothing to fill with".into());
                }
                state
                    .plan
                    .smart_fill(&recipes, config.smart_fill.into(), &mut rand::rng());

                let titles: HashMap<RecipeId, String> =
                    recipes.into_iter().map(|r| (r.id, r.title)).collect();
                print_plan(&state.plan, &titles);
                Ok(())
            }
        }
    }
}

/// Titles by id, empty when the catalog cannot be listed.
async fn recipe_titles(catalog: &CatalogSource) -> HashMap<RecipeId, String> {
    match catalog.list_all_recipes().await {
        Ok(recipes) => recipes.into_iter().map(|r| (r.id, r.title)).collect(),
        Err(e) => {
            tracing::warn!("Could not load recipe titles: {}", e);
            HashMap::new()
        }
    }
}

fn print_plan(plan: &PlanState, titles: &HashMap<RecipeId, String>) {
    for (idx, kind) in BucketKind::ALL.iter().enumerate() {
        if idx > 0 {
            println!();
        }
        let bucket = plan.bucket(*kind);
        println!("{} ({})", kind.heading(), bucket.len());
        println!("{}", "-".repeat(kind.heading().len().max(10)));
        if bucket.is_empty() {
            println!("  (empty)");
        }
        for id in bucket.ids() {
            match titles.get(id) {
                Some(title) => println!("  [{}] {}", id, title),
                None => println!("  [{}]", id),
            }
        }
    }
}
