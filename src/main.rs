//! Movie Memo CLI
//!
//! A command-line tool for browsing TMDB movies and keeping favorites with viewing memos.

use clap::Parser;
use movie_memo::cli::{
    args::{Cli, Commands, MemoAction},
    commands::{browse, favorite, memo, App},
};
use movie_memo::models::config::{load_config, Config};
use movie_memo::preflight;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let config = load_config();

    // Memo listing is purely local
    if let Commands::Memo {
        action: MemoAction::List,
    } = cli.command
    {
        memo::list_memos(&config)?;
        return Ok(());
    }

    if !cli.skip_preflight {
        run_preflight_checks(&config).await?;
    }

    let app = App::from_config(&config)?;

    match cli.command {
        Commands::Popular { page } => browse::popular(&app, page).await?,
        Commands::Search { query } => browse::search(&app, &query).await?,
        Commands::Show { movie_id } => browse::show(&app, movie_id).await?,
        Commands::Favorite { action } => favorite::execute_favorite(&app, action).await?,
        Commands::Memo { action } => match action {
            MemoAction::List => memo::list_memos(&config)?,
            MemoAction::Edit { movie_id, memo: form } => {
                memo::edit_memo(&app, movie_id, form).await?
            }
        },
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("movie_memo=debug")
    } else {
        EnvFilter::new("movie_memo=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

/// Run preflight checks and exit if any fail.
async fn run_preflight_checks(config: &Config) -> anyhow::Result<()> {
    use colored::Colorize;

    println!("{}", "Running preflight checks...".bold());
    println!();

    let results = preflight::run_preflight_checks(config).await;
    preflight::print_results(&results);

    println!();

    if !preflight::all_passed(&results) {
        anyhow::bail!("Preflight checks failed. Fix the issues above and try again.");
    }

    Ok(())
}
