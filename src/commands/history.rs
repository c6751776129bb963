use chrono::Local;
use clap::{Args, Subcommand};

use mealprep_core::{HistoryError, PlanHistory, WeekRange};

use super::OutputFormat;
use crate::config::Config;
use crate::store::AppState;

#[derive(Args)]
pub struct HistoryCommand {
    #[command(subcommand)]
    pub command: HistorySubcommand,
}

#[derive(Subcommand)]
pub enum HistorySubcommand {
    /// Save the current plan as a menu
    Save {
        /// Week label (defaults to the current planning week)
        #[arg(long, short)]
        week: Option<String>,
    },

    /// Replace the current plan with a saved menu
    Load {
        /// Week label of the saved menu
        week: String,
    },

    /// List saved menus, newest first
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Make a saved menu public and print its link
    Publish {
        /// Week label of the saved menu
        week: String,
    },

    /// Make a saved menu private again
    Unpublish {
        /// Week label of the saved menu
        week: String,
    },
}

impl HistoryCommand {
    pub fn run(
        &self,
        state: &mut AppState,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut history = PlanHistory::new(config.share_base_url.value.clone())
            .with_menus(std::mem::take(&mut state.saved_menus));
        let result = self.execute(&mut history, state);
        state.saved_menus = history.into_menus();
        result
    }

    fn execute(
        &self,
        history: &mut PlanHistory,
        state: &mut AppState,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            HistorySubcommand::Save { week } => {
                let label = match week {
                    Some(label) => label.clone(),
                    None => current_week(state).label(),
                };
                let snapshot = state.plan.snapshot();
                let menu = history.save(&label, snapshot.breakfast, snapshot.main);
                println!("Saved {}", menu);
                Ok(())
            }
            HistorySubcommand::Load { week } => {
                match history.load(week) {
                    Ok((breakfast, main)) => {
                        state.plan.replace(breakfast, main);
                        println!("Loaded {}", week);
                    }
                    Err(e) => report_miss(e),
                }
                Ok(())
            }
            HistorySubcommand::List { format } => {
                match format {
                    OutputFormat::Json => {
                        let output: Vec<serde_json::Value> = history
                            .list()
                            .iter()
                            .map(|m| {
                                serde_json::json!({
                                    "week": m.week,
                                    "slug": m.slug,
                                    "breakfast_ids": m.breakfast_ids,
                                    "main_ids": m.main_ids,
                                    "is_public": m.is_public,
                                    "saved_at": m.saved_at,
                                    "updated_at": m.updated_at,
                                    "share_url": history.share_url(m),
                                })
                            })
                            .collect();
                        println!("{}", serde_json::to_string_pretty(&output)?);
                    }
                    OutputFormat::Text => {
                        if history.list().is_empty() {
                            println!("No saved menus.");
                        }
                        for menu in history.list() {
                            println!("{}", menu);
                            if menu.is_public {
                                match history.share_url(menu) {
                                    Some(url) => println!("  {}", url),
                                    None => println!("  (no share link)"),
                                }
                            }
                        }
                    }
                }
                Ok(())
            }
            HistorySubcommand::Publish { week } => {
                match history.set_public(week, true) {
                    Ok(menu) => {
                        let menu = menu.clone();
                        match history.share_url(&menu) {
                            Some(url) => println!("{} is public: {}", menu.week, url),
                            None => println!("{} is public (no share link)", menu.week),
                        }
                    }
                    Err(e) => report_miss(e),
                }
                Ok(())
            }
            HistorySubcommand::Unpublish { week } => {
                match history.set_public(week, false) {
                    Ok(menu) => println!("{} is private", menu.week),
                    Err(e) => report_miss(e),
                }
                Ok(())
            }
        }
    }
}

/// The stored planning week, or the week containing today.
pub(crate) fn current_week(state: &AppState) -> WeekRange {
    state
        .week
        .unwrap_or_else(|| WeekRange::containing(Local::now().date_naive()))
}

/// Unknown menus are reported, not treated as failures.
fn report_miss(err: HistoryError) {
    tracing::warn!("{}", err);
    println!("Warning: {}", err);
}

#[cfg(test)]
mod tests {
    use super::*;
    use mealprep_core::{
        BucketKind, CatalogEntry, Consolidator, InMemoryCatalog, IngredientId, IngredientLine,
        Recipe, RecipeId,
    };
    use tempfile::tempdir;

    const LEMON: IngredientId = IngredientId(100);

    fn config(dir: &std::path::Path) -> Config {
        Config::load(Some(dir.join("none.yaml"))).unwrap()
    }

    fn command(command: HistorySubcommand) -> HistoryCommand {
        HistoryCommand { command }
    }

    /// A state with a planned week, a generated list and one removed item.
    async fn populated_state() -> AppState {
        let catalog = InMemoryCatalog::new(vec![CatalogEntry::new(
            Recipe::new(RecipeId(1), "Lemon Pasta"),
            vec![IngredientLine::new(LEMON, "lemon", 2.0, "ea").with_department("Produce")],
        )]);

        let mut state = AppState::default();
        state.plan.add_to_bucket(BucketKind::Main, RecipeId(1));
        state.grocery_list = Consolidator::new(catalog)
            .consolidate(&[RecipeId(1)])
            .await
            .unwrap();
        assert!(state.removals.remove(LEMON, &state.grocery_list));
        state
    }

    #[tokio::test]
    async fn test_unknown_week_leaves_state_untouched() {
        let temp_dir = tempdir().unwrap();
        let config = config(temp_dir.path());
        let mut state = populated_state().await;
        command(HistorySubcommand::Save {
            week: Some("Mar 3 - Mar 9".to_string()),
        })
        .run(&mut state, &config)
        .unwrap();

        let plan = state.plan.clone();
        let grocery_list = state.grocery_list.clone();
        let removals = state.removals.clone();
        let saved_menus = state.saved_menus.clone();

        for subcommand in [
            HistorySubcommand::Load {
                week: "Jan 1 - Jan 7".to_string(),
            },
            HistorySubcommand::Publish {
                week: "Jan 1 - Jan 7".to_string(),
            },
            HistorySubcommand::Unpublish {
                week: "Jan 1 - Jan 7".to_string(),
            },
        ] {
            command(subcommand).run(&mut state, &config).unwrap();

            assert_eq!(state.plan, plan);
            assert_eq!(state.grocery_list, grocery_list);
            assert_eq!(state.removals, removals);
            assert_eq!(state.saved_menus, saved_menus);
        }
    }

    #[tokio::test]
    async fn test_save_then_load_restores_plan() {
        let temp_dir = tempdir().unwrap();
        let config = config(temp_dir.path());
        let mut state = populated_state().await;
        let week = "Mar 3 - Mar 9".to_string();

        command(HistorySubcommand::Save {
            week: Some(week.clone()),
        })
        .run(&mut state, &config)
        .unwrap();
        assert_eq!(state.saved_menus.len(), 1);
        assert_eq!(state.saved_menus[0].main_ids, vec![RecipeId(1)]);

        state.plan.clear_buckets();
        command(HistorySubcommand::Load { week })
            .run(&mut state, &config)
            .unwrap();

        assert_eq!(state.plan.recipe_ids(), vec![RecipeId(1)]);
    }

    #[tokio::test]
    async fn test_publish_marks_menu_public() {
        let temp_dir = tempdir().unwrap();
        let config = config(temp_dir.path());
        let mut state = populated_state().await;
        let week = "Mar 3 - Mar 9".to_string();
        command(HistorySubcommand::Save {
            week: Some(week.clone()),
        })
        .run(&mut state, &config)
        .unwrap();

        command(HistorySubcommand::Publish { week: week.clone() })
            .run(&mut state, &config)
            .unwrap();
        assert!(state.saved_menus[0].is_public);

        command(HistorySubcommand::Unpublish { week })
            .run(&mut state, &config)
            .unwrap();
        assert!(!state.saved_menus[0].is_public);
    }
}
