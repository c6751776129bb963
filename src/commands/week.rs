use chrono::{Duration, NaiveDate};
use clap::{Args, Subcommand};

use mealprep_core::WeekRange;

use super::history::current_week;
use crate::store::AppState;

#[derive(Args)]
pub struct WeekCommand {
    #[command(subcommand)]
    pub command: WeekSubcommand,
}

#[derive(Subcommand)]
pub enum WeekSubcommand {
    /// Set the planning week
    Set {
        /// Start date (YYYY-MM-DD)
        #[arg(long, short)]
        start: String,

        /// End date (YYYY-MM-DD), defaults to 6 days after start
        #[arg(long, short)]
        end: Option<String>,
    },

    /// Show the planning week
    Show,
}

impl WeekCommand {
    pub fn run(&self, state: &mut AppState) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            WeekSubcommand::Set { start, end } => {
                let start = parse_date(start)?;
                let end = match end {
                    Some(end) => parse_date(end)?,
                    None => start + Duration::days(6),
                };
                let week = WeekRange::new(start, end)?;
                state.week = Some(week);
                println!("Planning {}", week.label());
                Ok(())
            }
            WeekSubcommand::Show => {
                let week = current_week(state);
                println!("{}", week.label());
                println!("{} to {}", week.start(), week.end());
                Ok(())
            }
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}'. Use YYYY-MM-DD format.", s))
}
