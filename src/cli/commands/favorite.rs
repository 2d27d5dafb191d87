//! Favorite command implementations.

use super::{print_movies, App};
use crate::cli::args::{FavoriteAction, MemoArgs};
use crate::models::memo::MemoInput;
use crate::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Execute favorite subcommand.
pub async fn execute_favorite(app: &App, action: FavoriteAction) -> Result<()> {
    match action {
        FavoriteAction::Add { movie_id, memo } => add(app, movie_id, memo).await,
        FavoriteAction::Remove { movie_id, confirm } => remove(app, movie_id, confirm).await,
        FavoriteAction::List => list(app).await,
        FavoriteAction::Sync => sync(app).await,
    }
}

/// Fill the memo form, using the movie title and today as defaults.
pub(crate) async fn memo_input(app: &App, movie_id: u64, args: MemoArgs) -> Result<MemoInput> {
    let defaults = match args.title {
        Some(ref title) => MemoInput::defaults_for(title),
        None => {
            let detail = app.catalog().detail(movie_id).await?;
            MemoInput::defaults_for(&detail.title)
        }
    };

    Ok(MemoInput {
        title: args.title.unwrap_or(defaults.title),
        content: args.content,
        watched_at: args.watched_at.unwrap_or(defaults.watched_at),
    })
}

async fn add(app: &App, movie_id: u64, args: MemoArgs) -> Result<()> {
    let input = memo_input(app, movie_id, args).await?;
    let memo = app.favorites.add_favorite(movie_id, input).await?;

    println!("{} movie {}", "[FAVORITE] Added".bold().green(), movie_id);
    println!("  Memo: {} (watched {})", memo.title, memo.watched_at);
    Ok(())
}

async fn remove(app: &App, movie_id: u64, confirm: bool) -> Result<()> {
    if !confirm {
        println!(
            "{}",
            format!(
                "[WARN] Removing movie {} from favorites also deletes its memo.",
                movie_id
            )
            .yellow()
        );
        println!("  Use --confirm to proceed");
        return Ok(());
    }

    app.favorites.remove_favorite(movie_id).await?;
    println!("{} movie {}", "[FAVORITE] Removed".bold().green(), movie_id);
    Ok(())
}

async fn list(app: &App) -> Result<()> {
    println!("{}", "★ Favorites".bold().cyan());
    println!();

    let movies = app.catalog().all_favorites().await?;
    print_movies(app, &movies);

    let without_memo: Vec<u64> = movies
        .iter()
        .map(|m| m.id)
        .filter(|&id| app.favorites.memo_for(id).is_none())
        .collect();
    if !without_memo.is_empty() {
        println!();
        println!(
            "{} {} favorites have no memo on this device",
            "[INFO]".blue(),
            without_memo.len()
        );
    }
    Ok(())
}

async fn sync(app: &App) -> Result<()> {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Fetching favorites from TMDB...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let report = app.favorites.reconcile().await;
    pb.finish_and_clear();
    let report = report?;

    println!("{}", "[SYNC] Complete!".bold().green());
    if report.is_clean() {
        println!("  Local favorites already match TMDB");
        return Ok(());
    }
    println!("  Added locally:   {:?}", report.added);
    println!("  Removed locally: {:?}", report.removed);
    if !report.orphaned_memos.is_empty() {
        println!(
            "  {} memos without a favorite: {:?}",
            "[WARN]".yellow(),
            report.orphaned_memos
        );
    }
    Ok(())
}
