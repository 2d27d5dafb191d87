//! Command line argument definitions.

use clap::{Args, Parser, Subcommand};

/// Movie Memo - Find movies and keep notes on your favorites
#[derive(Parser, Debug)]
#[command(name = "movie-memo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip preflight checks
    #[arg(long, global = true)]
    pub skip_preflight: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List popular movies
    Popular {
        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Search movies by title
    Search {
        /// Search query
        #[arg(value_name = "QUERY")]
        query: String,
    },

    /// Show movie details, favorite status and memo
    Show {
        /// TMDB movie id
        #[arg(value_name = "MOVIE_ID")]
        movie_id: u64,
    },

    /// Manage favorites
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },

    /// Manage viewing memos
    Memo {
        #[command(subcommand)]
        action: MemoAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum FavoriteAction {
    /// Add a movie to favorites with a viewing memo
    Add {
        /// TMDB movie id
        #[arg(value_name = "MOVIE_ID")]
        movie_id: u64,

        #[command(flatten)]
        memo: MemoArgs,
    },

    /// Remove a movie from favorites (also deletes its memo)
    Remove {
        /// TMDB movie id
        #[arg(value_name = "MOVIE_ID")]
        movie_id: u64,

        /// Confirm deleting the memo along with the favorite
        #[arg(long)]
        confirm: bool,
    },

    /// List favorites from your TMDB account
    List,

    /// Pull the TMDB favorites list into the local favorite set
    Sync,
}

#[derive(Subcommand, Debug)]
pub enum MemoAction {
    /// List all local memos
    List,

    /// Rewrite the memo of a favorite movie
    Edit {
        /// TMDB movie id
        #[arg(value_name = "MOVIE_ID")]
        movie_id: u64,

        #[command(flatten)]
        memo: MemoArgs,
    },
}

/// Memo form fields.
#[derive(Args, Debug)]
pub struct MemoArgs {
    /// Memo title (default: "<movie title> notes")
    #[arg(short, long)]
    pub title: Option<String>,

    /// Memo text, at least 5 characters
    #[arg(short, long)]
    pub content: String,

    /// Watched date, YYYY-MM-DD (default: today)
    #[arg(short, long)]
    pub watched_at: Option<String>,
}
