use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod catalog;
mod commands;
mod config;
mod store;

use catalog::CatalogSource;
use commands::{
    ConfigCommand, GroceryCommand, HistoryCommand, PlanCommand, RecipesCommand, WeekCommand,
};
use config::Config;
use store::StateStore;

#[derive(Parser)]
#[command(name = "mealprep")]
#[command(version)]
#[command(about = "Weekly meal planning and grocery lists", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the recipe catalog
    Recipes(RecipesCommand),

    /// Manage the breakfast and lunch + dinner buckets
    Plan(PlanCommand),

    /// Build and edit the grocery list
    Grocery(GroceryCommand),

    /// Save, load and share weekly menus
    History(HistoryCommand),

    /// Set the planning week
    Week(WeekCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mealprep=warn,mealprep_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;
    let store = StateStore::new(&config.data_dir.value);

    match cli.command {
        Some(Commands::Recipes(cmd)) => {
            let catalog = CatalogSource::from_config(&config)?;
            cmd.run(catalog).await?;
        }
        Some(Commands::Plan(cmd)) => {
            let catalog = CatalogSource::from_config(&config)?;
            let mut state = store.load()?;
            cmd.run(&mut state, &catalog, &config).await?;
            store.save(&state)?;
        }
        Some(Commands::Grocery(cmd)) => {
            let catalog = CatalogSource::from_config(&config)?;
            let mut state = store.load()?;
            cmd.run(&mut state, catalog).await?;
            store.save(&state)?;
        }
        Some(Commands::History(cmd)) => {
            let mut state = store.load()?;
            cmd.run(&mut state, &config)?;
            store.save(&state)?;
        }
        Some(Commands::Week(cmd)) => {
            let mut state = store.load()?;
            cmd.run(&mut state)?;
            store.save(&state)?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
