//! CLI command implementations.

pub mod browse;
pub mod favorite;
pub mod memo;

use crate::core::favorites::Favorites;
use crate::core::query::{CachePolicy, Catalog};
use crate::core::store::{FileStore, LocalStore};
use crate::models::config::Config;
use crate::models::movie::Movie;
use crate::services::tmdb::TmdbClient;
use crate::Result;
use colored::Colorize;
use std::sync::Arc;

/// Everything a command needs, wired from configuration.
pub struct App {
    pub favorites: Favorites<TmdbClient, FileStore>,
}

impl App {
    /// Build the client, query cache and local store.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = TmdbClient::from_settings(&config.tmdb)?;
        let catalog = Arc::new(Catalog::new(client, CachePolicy::from(&config.cache)));
        let store = LocalStore::new(FileStore::new(&config.data_dir));
        Ok(Self {
            favorites: Favorites::new(catalog, store),
        })
    }

    pub fn catalog(&self) -> &Catalog<TmdbClient> {
        self.favorites.catalog()
    }
}

/// Print a movie list, marking local favorites.
pub(crate) fn print_movies(app: &App, movies: &[Movie]) {
    if movies.is_empty() {
        println!("No movies found.");
        return;
    }

    println!(
        "{:<3} {:<10} {:<40} {:<12} {}",
        "",
        "ID".bold(),
        "Title".bold(),
        "Released".bold(),
        "Rating".bold()
    );
    println!("{}", "-".repeat(75));

    for movie in movies {
        let marker = if app.favorites.is_favorite_now(movie.id) {
            "★".yellow().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "{:<3} {:<10} {:<40} {:<12} {:.1}",
            marker,
            movie.id,
            truncate(&movie.title, 40),
            movie.release_date,
            movie.vote_average
        );
    }
}

/// Shorten a string to at most `max` characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
