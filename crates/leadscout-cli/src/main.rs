mod output;
mod search;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "leadscout")]
#[command(about = "Collect business leads by category across a city's neighborhoods")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a search campaign and stream new leads as JSON Lines
    Search(SearchArgs),
    /// List the configured search categories
    Categories,
}

#[derive(Debug, Args)]
pub(crate) struct SearchArgs {
    /// State (or province) to search in
    #[arg(long)]
    pub state: String,

    /// City to search in
    #[arg(long)]
    pub city: String,

    /// Restrict the run to a single category (by id)
    #[arg(long)]
    pub category: Option<String>,

    /// Neighborhood to search; repeat for several. Omit to search the whole city
    #[arg(long = "area")]
    pub areas: Vec<String>,

    /// Maximum new leads per category; defaults to LEADSCOUT_CATEGORY_CAP
    #[arg(long)]
    pub cap: Option<usize>,

    /// Append leads to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = leadscout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog = leadscout_core::load_categories(&config.categories_path)?;

    match cli.command {
        Commands::Categories => {
            for target in catalog.targets() {
                println!("{}\t{}\t{}", target.id, target.label, target.query);
            }
        }
        Commands::Search(args) => search::run_search(&config, &catalog, &args).await?,
    }

    Ok(())
}
