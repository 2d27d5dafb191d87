//! TMDB API client.

use crate::models::config::TmdbSettings;
use crate::models::movie::{FavoriteAck, FavoriteRequest, MovieDetail, MoviePage};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Read/write operations against the remote movie catalog.
///
/// `TmdbClient` is the production implementation; the query layer and the
/// favorite synchronizer are generic over this trait.
#[async_trait]
pub trait CatalogApi: Send + Sync + 'static {
    /// One page of the popular movies list.
    async fn popular(&self, page: u32) -> Result<MoviePage>;

    /// Search movies by title. Blank queries are rejected before any request.
    async fn search(&self, query: &str) -> Result<MoviePage>;

    /// Full details for one movie.
    async fn movie_detail(&self, movie_id: u64) -> Result<MovieDetail>;

    /// Add or remove a movie from the account favorites.
    async fn set_favorite(&self, movie_id: u64, favorite: bool) -> Result<FavoriteAck>;

    /// One page of the account favorites, most recently added first.
    async fn favorite_movies(&self, page: u32) -> Result<MoviePage>;
}

/// TMDB client configuration.
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub base_url: String,
    /// Bearer access token (API v4 style)
    pub access_token: String,
    pub account_id: String,
    pub session_id: String,
    pub language: String,
    pub include_adult: bool,
    pub timeout_secs: u64,
}

impl TmdbConfig {
    /// Build the client configuration from settings.
    /// Missing credentials are reported here, not on first request.
    pub fn from_settings(settings: &TmdbSettings) -> Result<Self> {
        let required = |value: &Option<String>, name: &str| {
            value
                .clone()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::ConfigMissing(name.to_string()))
        };

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            access_token: required(&settings.access_token, "TMDB_ACCESS_TOKEN")?,
            account_id: required(&settings.account_id, "TMDB_ACCOUNT_ID")?,
            session_id: required(&settings.session_id, "TMDB_SESSION_ID")?,
            language: settings.language.clone(),
            include_adult: settings.include_adult,
            timeout_secs: settings.timeout_secs,
        })
    }
}

/// TMDB API client.
pub struct TmdbClient {
    config: TmdbConfig,
    client: reqwest::Client,
}

/// Error body TMDB returns with non-2xx responses.
#[derive(Debug, Deserialize)]
struct StatusBody {
    status_message: String,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    /// Create a new TMDB client from application settings.
    pub fn from_settings(settings: &TmdbSettings) -> Result<Self> {
        Self::new(TmdbConfig::from_settings(settings)?)
    }

    /// Build a GET request with proper authentication.
    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header("Accept", "application/json")
            .bearer_auth(&self.config.access_token)
    }

    /// Build a POST request with proper authentication.
    fn build_post(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header("Accept", "application/json")
            .bearer_auth(&self.config.access_token)
    }

    /// Build URL with the language parameter always present.
    fn build_url(&self, path: &str, extra_params: &str) -> String {
        format!(
            "{}/{}?language={}{}",
            self.config.base_url, path, self.config.language, extra_params
        )
    }

    /// Path of an account-scoped endpoint.
    fn account_path(&self, suffix: &str) -> String {
        format!("account/{}/{}", self.config.account_id, suffix)
    }

    fn session_param(&self) -> String {
        format!("&session_id={}", urlencoding::encode(&self.config.session_id))
    }

    /// Verify the access token is accepted.
    pub async fn verify_credentials(&self) -> Result<bool> {
        let url = format!("{}/authentication", self.config.base_url);
        match self.build_request(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, extra: &str, subject: &str) -> Result<T> {
        tracing::debug!("GET /{}", path);
        let url = self.build_url(path, extra);
        let resp = self.build_request(&url).send().await?;
        read_json(resp, subject).await
    }
}

#[async_trait]
impl CatalogApi for TmdbClient {
    async fn popular(&self, page: u32) -> Result<MoviePage> {
        self.get_json("movie/popular", &format!("&page={}", page.max(1)), "popular movies")
            .await
    }

    async fn search(&self, query: &str) -> Result<MoviePage> {
        validate_query(query)?;
        let extra = format!(
            "&query={}&include_adult={}",
            urlencoding::encode(query),
            self.config.include_adult
        );
        self.get_json("search/movie", &extra, "search").await
    }

    async fn movie_detail(&self, movie_id: u64) -> Result<MovieDetail> {
        let subject = format!("movie {}", movie_id);
        self.get_json(&format!("movie/{}", movie_id), "", &subject).await
    }

    async fn set_favorite(&self, movie_id: u64, favorite: bool) -> Result<FavoriteAck> {
        let path = self.account_path("favorite");
        tracing::debug!("POST /{} (movie {}, favorite={})", path, movie_id, favorite);

        // The favorite endpoint takes no language parameter.
        let url = format!(
            "{}/{}?session_id={}",
            self.config.base_url,
            path,
            urlencoding::encode(&self.config.session_id)
        );
        let resp = self
            .build_post(&url)
            .json(&FavoriteRequest::movie(movie_id, favorite))
            .send()
            .await?;
        read_json(resp, &format!("movie {}", movie_id)).await
    }

    async fn favorite_movies(&self, page: u32) -> Result<MoviePage> {
        let extra = format!(
            "{}&sort_by=created_at.desc&page={}",
            self.session_param(),
            page.max(1)
        );
        self.get_json(&self.account_path("favorite/movies"), &extra, "favorites")
            .await
    }
}

/// Reject empty or whitespace-only search queries.
pub fn validate_query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(Error::validation("search query must not be empty"));
    }
    Ok(())
}

/// Compose a full image URL from a relative TMDB path, e.g. `w500` or `original`.
pub fn image_url(path: &str, size: &str) -> String {
    format!("{}/{}{}", TMDB_IMAGE_BASE_URL, size, path)
}

/// Decode a successful response, or map the status to an error.
async fn read_json<T: DeserializeOwned>(resp: reqwest::Response, subject: &str) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let message = match resp.json::<StatusBody>().await {
        Ok(body) => body.status_message,
        Err(_) => status.canonical_reason().unwrap_or("unknown").to_string(),
    };
    Err(error_for_status(status.as_u16(), message, subject))
}

/// Map a non-2xx status to the error taxonomy.
fn error_for_status(status: u16, message: String, subject: &str) -> Error {
    match status {
        401 | 403 => Error::Auth(message),
        404 => Error::NotFound(format!("{} ({})", subject, message)),
        _ => Error::Http { status, message },
    }
}
