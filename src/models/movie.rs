//! Movie data model as returned by the TMDB catalog.

use serde::{Deserialize, Serialize};

/// A movie as it appears in list endpoints (popular, search, favorites).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
    /// Average rating, 0-10.
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub popularity: f32,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
}

/// One page of a paginated movie list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    pub page: u32,
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

impl MoviePage {
    /// Whether more pages follow this one.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Ids of the movies on this page, in order.
    pub fn ids(&self) -> Vec<u64> {
        self.results.iter().map(|m| m.id).collect()
    }
}

/// Full movie details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub popularity: f32,
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Runtime in minutes, 0 when unknown.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub runtime: u32,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub revenue: u64,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
}

impl MovieDetail {
    /// Genre names joined for display.
    pub fn genre_names(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Genre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Production company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCompany {
    pub id: u64,
    pub name: String,
    pub logo_path: Option<String>,
    #[serde(default)]
    pub origin_country: String,
}

/// Body of a favorite add/remove request.
#[derive(Debug, Clone, Serialize)]
pub struct FavoriteRequest {
    pub media_type: &'static str,
    pub media_id: u64,
    pub favorite: bool,
}

impl FavoriteRequest {
    pub fn movie(media_id: u64, favorite: bool) -> Self {
        Self {
            media_type: "movie",
            media_id,
            favorite,
        }
    }
}

/// Acknowledgement returned by the favorite endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteAck {
    pub status_code: i32,
    pub status_message: String,
}

/// Find a movie by id in an already fetched list.
pub fn find_movie(movies: &[Movie], movie_id: u64) -> Option<&Movie> {
    movies.iter().find(|m| m.id == movie_id)
}

fn null_as_zero<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(0))
}
