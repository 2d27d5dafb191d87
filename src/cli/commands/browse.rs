//! Popular, search and show command implementations.

use super::{print_movies, App};
use crate::core::favorites::FavoriteState;
use crate::models::movie::MovieDetail;
use crate::services::tmdb::image_url;
use crate::Result;
use colored::Colorize;

/// List one page of popular movies.
pub async fn popular(app: &App, page: u32) -> Result<()> {
    println!("{}", format!("🎬 Popular movies (page {})", page).bold().cyan());
    println!();

    let result = app.catalog().popular(page).await?;
    print_movies(app, &result.results);

    println!();
    println!("Page {} of {}", result.page, result.total_pages);
    Ok(())
}

/// Search movies by title.
pub async fn search(app: &App, query: &str) -> Result<()> {
    println!("{} {}", "🔍 Searching:".bold().cyan(), query);
    println!();

    let result = app.catalog().search(query).await?;
    print_movies(app, &result.results);

    println!();
    println!("{} results", result.total_results);
    Ok(())
}

/// Show details for one movie together with local favorite state and memo.
pub async fn show(app: &App, movie_id: u64) -> Result<()> {
    let detail = app.catalog().detail(movie_id).await?;
    print_detail(&detail);

    println!();
    match app.favorites.state(movie_id) {
        FavoriteState::Favorite => println!("{}", "★ In your favorites".yellow().bold()),
        state => println!("Favorite: {}", state),
    }

    if let Some(memo) = app.favorites.memo_for(movie_id) {
        println!();
        println!("{} {}", "📝".bold(), memo.title.bold());
        println!("  Watched: {}", memo.watched_at);
        println!("  {}", memo.content);
    }
    Ok(())
}

fn print_detail(detail: &MovieDetail) {
    println!("{} ({})", detail.title.bold().cyan(), detail.id);
    if !detail.tagline.is_empty() {
        println!("  {}", detail.tagline.italic());
    }
    println!();
    println!("  Released:  {}", detail.release_date);
    println!("  Status:    {}", detail.status);
    println!("  Rating:    {:.1}/10", detail.vote_average);
    if detail.runtime > 0 {
        println!("  Runtime:   {} min", detail.runtime);
    }
    if !detail.genres.is_empty() {
        println!("  Genres:    {}", detail.genre_names());
    }
    if detail.budget > 0 {
        println!("  Budget:    ${}", detail.budget);
    }
    if detail.revenue > 0 {
        println!("  Revenue:   ${}", detail.revenue);
    }
    if !detail.production_companies.is_empty() {
        let companies: Vec<String> = detail
            .production_companies
            .iter()
            .map(|c| {
                if c.origin_country.is_empty() {
                    c.name.clone()
                } else {
                    format!("{} ({})", c.name, c.origin_country)
                }
            })
            .collect();
        println!("  Companies: {}", companies.join(", "));
    }
    if let Some(poster) = &detail.poster_path {
        println!("  Poster:    {}", image_url(poster, "w500"));
    }

    if !detail.overview.is_empty() {
        println!();
        println!("{}", detail.overview);
    }
}
