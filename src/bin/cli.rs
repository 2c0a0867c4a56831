use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use meal_favourites::config::Config;
use meal_favourites::{
    AddResult, DefaultSession, Dispatched, RemoveResult, RenderUnit, SearchOutcome,
};

#[derive(Parser)]
#[command(name = "meals")]
#[command(about = "Recipe search and favourites CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search TheMealDB by meal name
    Search {
        /// Query string; blank clears the results
        query: String,
    },
    /// Show ingredients and instructions for a meal
    Show {
        /// Meal ID (idMeal)
        meal_id: String,
    },
    /// List favourite meals
    List,
    /// Add a meal to favourites by ID
    Add {
        /// Meal ID to look up and add
        meal_id: String,
    },
    /// Remove a meal from favourites
    Remove {
        /// Meal ID to remove
        meal_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let session = DefaultSession::open(&config);

    match cli.command {
        Commands::Search { query } => match session.search(&query).await {
            SearchOutcome::Cleared => println!("Nothing to search for."),
            SearchOutcome::Results(0) => println!("No results found."),
            SearchOutcome::Results(_) => {
                for unit in session.search_results() {
                    let starred = session.is_favourite(&unit.id)?;
                    print_unit(&unit, starred);
                }
            }
            SearchOutcome::Failed(e) => {
                eprintln!("Search failed: {}", e);
                std::process::exit(1);
            }
            SearchOutcome::Superseded => {}
        },
        Commands::Show { meal_id } => match session.show(&meal_id).await? {
            Some(view) => println!("{}", view),
            None => {
                eprintln!("Meal not found: {}", meal_id);
                std::process::exit(1);
            }
        },
        Commands::List => {
            let favourites = session.favourites()?;
            if favourites.is_empty() {
                println!("No favourites yet.");
            } else {
                for unit in favourites {
                    print_unit(&unit, true);
                }
            }
        }
        Commands::Add { meal_id } => {
            let result = session.add_by_id(&meal_id).await?;
            if let Some(notice) = Dispatched::Add(result).notice() {
                println!("{}", notice);
            }
            if result == AddResult::Added {
                println!("Favourites: {}", session.favourites()?.len());
            }
        }
        Commands::Remove { meal_id } => match session.remove(&meal_id)? {
            RemoveResult::Removed => println!("Removed from favourites: {}", meal_id),
            RemoveResult::NotFound => {}
        },
    }

    Ok(())
}

fn print_unit(unit: &RenderUnit, starred: bool) {
    let marker = if starred { "*" } else { " " };
    println!("{} {:>6}  {}", marker, unit.id, unit.name);
    if !unit.thumbnail.is_empty() {
        println!("          {}", unit.thumbnail);
    }
}
