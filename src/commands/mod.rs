use clap::ValueEnum;

mod config_cmd;
mod grocery;
mod history;
mod plan;
mod recipes;
mod week;

pub use config_cmd::ConfigCommand;
pub use grocery::GroceryCommand;
pub use history::HistoryCommand;
pub use plan::PlanCommand;
pub use recipes::RecipesCommand;
pub use week::WeekCommand;

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
