mod export;
mod render;
mod run;

use clap::{Parser, Subcommand};
use placedist_core::Category;
use tracing_subscriber::EnvFilter;

use crate::run::{run_distances, RunArgs};

#[derive(Debug, Parser)]
#[command(name = "placedist")]
#[command(about = "Distance from each coordinate to the nearest place of each category")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search every category around every input coordinate
    Run(RunArgs),
    /// List the searched categories in output column order
    Categories,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let log_level = std::env::var("PLACEDIST_LOG_LEVEL").unwrap_or_else(|_| "info".to_owned());
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    // Logs go to stderr so the table on stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run_distances(&args).await?,
        Commands::Categories => {
            for category in Category::ALL {
                println!("{}", category.label());
            }
        }
    }

    Ok(())
}
