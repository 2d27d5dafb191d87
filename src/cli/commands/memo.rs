//! Memo command implementations.

use super::favorite::memo_input;
use super::{truncate, App};
use crate::cli::args::MemoArgs;
use crate::core::store::{FileStore, LocalStore};
use crate::models::config::Config;
use crate::Result;
use colored::Colorize;

/// List local memos. Needs no network access.
pub fn list_memos(config: &Config) -> Result<()> {
    println!("{}", "📝 Memos".bold().cyan());
    println!();

    let store = LocalStore::new(FileStore::new(&config.data_dir));
    let memos = store.list_memos();
    if memos.is_empty() {
        println!("No memos found.");
        return Ok(());
    }

    println!(
        "{:<10} {:<12} {:<30} {}",
        "Movie".bold(),
        "Watched".bold(),
        "Title".bold(),
        "Memo".bold()
    );
    println!("{}", "-".repeat(80));

    for memo in &memos {
        let marker = if store.is_favorite(memo.movie_id) {
            String::new()
        } else {
            format!(" {}", "(not a favorite)".yellow())
        };
        println!(
            "{:<10} {:<12} {:<30} {}{}",
            memo.movie_id,
            memo.watched_at,
            truncate(&memo.title, 30),
            truncate(&memo.content, 30),
            marker
        );
    }

    println!();
    println!("Data directory: {}", config.data_dir.display());
    Ok(())
}

/// Rewrite the memo of a favorite movie.
pub async fn edit_memo(app: &App, movie_id: u64, args: MemoArgs) -> Result<()> {
    let input = memo_input(app, movie_id, args).await?;
    let memo = app.favorites.update_memo(movie_id, input)?;

    println!("{} movie {}", "[MEMO] Updated".bold().green(), movie_id);
    println!("  {} (watched {})", memo.title, memo.watched_at);
    Ok(())
}
