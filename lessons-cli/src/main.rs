use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod catalog;
mod commands;
mod config;

#[derive(Parser)]
#[command(name = "lessons", about = "Interactive lessons with XP and levels")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Lesson catalog to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List lessons in the catalog
    List,
    /// Show a lesson's content and exercises
    Show(commands::show::ShowArgs),
    /// Play lessons interactively
    Play(commands::play::PlayArgs),
    /// Practice keywords to build mastery
    Practice(commands::practice::PracticeArgs),
    /// Validate a lesson catalog file
    Check(commands::check::CheckArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config::ConfigLoader::load()?;
    let catalog_flag = cli.catalog.as_deref();

    match cli.command {
        Commands::List => commands::list::run(catalog_flag, &config),
        Commands::Show(args) => commands::show::run(args, catalog_flag, &config),
        Commands::Play(args) => commands::play::run(args, catalog_flag, &config).await,
        Commands::Practice(args) => commands::practice::run(args, &config).await,
        Commands::Check(args) => commands::check::run(args),
        Commands::Config(args) => commands::config::run(args, &config),
    }
}
