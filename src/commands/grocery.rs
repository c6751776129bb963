use clap::{Args, Subcommand};

use mealprep_core::{
    format_quantity, GenerationOutcome, GroceryList, GrocerySession, IngredientId,
};

use super::OutputFormat;
use crate::catalog::CatalogSource;
use crate::store::AppState;

#[derive(Args)]
pub struct GroceryCommand {
    #[command(subcommand)]
    pub command: GrocerySubcommand,
}

#[derive(Subcommand)]
pub enum GrocerySubcommand {
    /// Build the grocery list from the current plan
    Generate {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the grocery list without removed items
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Hide an item from the grocery list
    Remove {
        /// Ingredient ID
        id: IngredientId,
    },

    /// Show a removed item again
    Restore {
        /// Ingredient ID
        id: IngredientId,
    },

    /// Show every removed item again
    Reset,
}

impl GroceryCommand {
    pub async fn run(
        &self,
        state: &mut AppState,
        catalog: CatalogSource,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut session = GrocerySession::from_parts(
            catalog,
            std::mem::take(&mut state.plan),
            std::mem::take(&mut state.removals),
            std::mem::take(&mut state.grocery_list),
        );
        let result = self.execute(&mut session).await;

        let (plan, removals, grocery_list) = session.into_parts();
        state.plan = plan;
        state.removals = removals;
        state.grocery_list = grocery_list;
        result
    }

    async fn execute(
        &self,
        session: &mut GrocerySession<CatalogSource>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            GrocerySubcommand::Generate { format } => {
                // Keep the stored list and removals untouched
                if session.plan().is_empty() {
                    println!("Plan is empty, add recipes first.");
                    return Ok(());
                }
                match session.generate_grocery_list().await? {
                    GenerationOutcome::Applied => {
                        print_list(&session.visible_grocery_list(), *format)?;
                    }
                    GenerationOutcome::Stale => {
                        println!("Plan changed while building the list, run generate again.");
                    }
                }
                Ok(())
            }
            GrocerySubcommand::Show { format } => {
                print_list(&session.visible_grocery_list(), *format)?;
                let hidden = session.overlay().len();
                if hidden > 0 && matches!(format, OutputFormat::Text) {
                    println!("\n{} item(s) removed, `grocery reset` shows them again.", hidden);
                }
                Ok(())
            }
            GrocerySubcommand::Remove { id } => {
                let name = session.grocery_list().find(*id).map(|i| i.name.clone());
                match name {
                    Some(name) if session.remove_grocery_item(*id) => {
                        println!("Removed {} from the grocery list", name);
                    }
                    _ => println!("Ingredient {} is not on the grocery list", id),
                }
                Ok(())
            }
            GrocerySubcommand::Restore { id } => {
                if session.restore_grocery_item(*id) {
                    println!("Restored ingredient {}", id);
                } else {
                    println!("Ingredient {} was not removed", id);
                }
                Ok(())
            }
            GrocerySubcommand::Reset => {
                session.reset_removals();
                println!("All removed items restored");
                Ok(())
            }
        }
    }
}

fn print_list(list: &GroceryList, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(list)?);
        }
        OutputFormat::Text => {
            if list.is_empty() {
                println!("Grocery list is empty.");
                return Ok(());
            }
            for (idx, section) in list.sections.iter().enumerate() {
                if idx > 0 {
                    println!();
                }
                println!("{}", section.name);
                println!("{}", "-".repeat(section.name.len().max(10)));
                for item in &section.items {
                    println!("  [{}] {}", item.ingredient_id, item);
                    println!("      for: {}", item.recipes.join(", "));
                    if let Some(warning) = &item.unit_mismatch {
                        println!("      ! {}", warning);
                        println!(
                            "      ! raw total {} (mixed units)",
                            format_quantity(item.raw_total())
                        );
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mealprep_core::{BucketKind, CatalogEntry, InMemoryCatalog, IngredientLine, Recipe, RecipeId};

    const LEMON: IngredientId = IngredientId(100);
    const EGGS: IngredientId = IngredientId(200);

    fn entries() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::new(
                Recipe::new(RecipeId(1), "Lemon Pasta"),
                vec![IngredientLine::new(LEMON, "lemon", 2.0, "ea").with_department("Produce")],
            ),
            CatalogEntry::new(
                Recipe::new(RecipeId(2), "Shakshuka"),
                vec![IngredientLine::new(EGGS, "eggs", 6.0, "ea").with_department("Dairy")],
            ),
        ]
    }

    fn catalog() -> CatalogSource {
        CatalogSource::File(InMemoryCatalog::new(entries()))
    }

    fn command(command: GrocerySubcommand) -> GroceryCommand {
        GroceryCommand { command }
    }

    fn generate() -> GroceryCommand {
        command(GrocerySubcommand::Generate {
            format: OutputFormat::Json,
        })
    }

    fn planned_state() -> AppState {
        let mut state = AppState::default();
        state.plan.add_to_bucket(BucketKind::Breakfast, RecipeId(2));
        state.plan.add_to_bucket(BucketKind::Main, RecipeId(1));
        state
    }

    #[tokio::test]
    async fn test_generate_stores_list_in_state() {
        let mut state = planned_state();

        generate().run(&mut state, catalog()).await.unwrap();

        assert_eq!(state.grocery_list.len(), 2);
        assert!(state.grocery_list.contains(LEMON));
        assert!(state.grocery_list.contains(EGGS));
        assert_eq!(state.plan.recipe_ids().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_generate_keeps_previous_state() {
        let mut state = planned_state();
        generate().run(&mut state, catalog()).await.unwrap();
        command(GrocerySubcommand::Remove { id: LEMON })
            .run(&mut state, catalog())
            .await
            .unwrap();
        assert!(state.removals.is_removed(LEMON));

        let previous_plan = state.plan.clone();
        let previous_list = state.grocery_list.clone();
        let previous_removals = state.removals.clone();

        let mut offline = InMemoryCatalog::new(entries());
        offline.mark_unavailable(RecipeId(2));
        let result = generate().run(&mut state, CatalogSource::File(offline)).await;

        assert!(result.is_err());
        assert_eq!(state.plan, previous_plan);
        assert_eq!(state.grocery_list, previous_list);
        assert_eq!(state.removals, previous_removals);
    }

    #[tokio::test]
    async fn test_generate_with_empty_plan_keeps_list() {
        let mut state = planned_state();
        generate().run(&mut state, catalog()).await.unwrap();
        command(GrocerySubcommand::Remove { id: EGGS })
            .run(&mut state, catalog())
            .await
            .unwrap();
        let previous_list = state.grocery_list.clone();
        let previous_removals = state.removals.clone();

        state.plan.clear_buckets();
        generate().run(&mut state, catalog()).await.unwrap();

        assert_eq!(state.grocery_list, previous_list);
        assert_eq!(state.removals, previous_removals);
        assert!(state.removals.is_removed(EGGS));
    }

    #[tokio::test]
    async fn test_remove_unknown_item_changes_nothing() {
        let mut state = planned_state();
        generate().run(&mut state, catalog()).await.unwrap();

        command(GrocerySubcommand::Remove {
            id: IngredientId(999),
        })
        .run(&mut state, catalog())
        .await
        .unwrap();

        assert!(state.removals.is_empty());
        assert_eq!(state.grocery_list.len(), 2);
    }

    #[tokio::test]
    async fn test_restore_and_reset_clear_removals() {
        let mut state = planned_state();
        generate().run(&mut state, catalog()).await.unwrap();
        for id in [LEMON, EGGS] {
            command(GrocerySubcommand::Remove { id })
                .run(&mut state, catalog())
                .await
                .unwrap();
        }
        assert_eq!(state.removals.len(), 2);

        command(GrocerySubcommand::Restore { id: LEMON })
            .run(&mut state, catalog())
            .await
            .unwrap();
        assert!(!state.removals.is_removed(LEMON));
        assert!(state.removals.is_removed(EGGS));

        command(GrocerySubcommand::Reset)
            .run(&mut state, catalog())
            .await
            .unwrap();
        assert!(state.removals.is_empty());
    }
}
