//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use movie_memo::core::favorites::Favorites;
use movie_memo::core::query::{CachePolicy, Catalog};
use movie_memo::core::store::{LocalStore, MemoryStore};
use movie_memo::models::memo::MemoInput;
use movie_memo::models::movie::{FavoriteAck, Movie, MovieDetail, MoviePage};
use movie_memo::services::tmdb::CatalogApi;
use movie_memo::{Error, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Favorites per page served by the fake.
pub const FAVORITES_PAGE_SIZE: usize = 2;

/// In-memory catalog that counts every call.
#[derive(Default)]
pub struct FakeCatalog {
    pub popular_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub favorite_list_calls: AtomicUsize,
    pub set_favorite_calls: AtomicUsize,
    /// Account favorites, most recent first.
    pub remote_favorites: Mutex<Vec<u64>>,
    pub fail_set_favorite: AtomicBool,
}

impl FakeCatalog {
    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn remote(&self) -> Vec<u64> {
        self.remote_favorites.lock().unwrap().clone()
    }

    pub fn set_remote(&self, ids: &[u64]) {
        *self.remote_favorites.lock().unwrap() = ids.to_vec();
    }
}

pub fn movie(id: u64, title: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        poster_path: Some(format!("/{}.jpg", id)),
        backdrop_path: None,
        overview: String::new(),
        release_date: "1999-10-15".to_string(),
        vote_average: 8.4,
        popularity: 61.4,
        genre_ids: vec![18],
    }
}

fn single_page(results: Vec<Movie>) -> MoviePage {
    let total = results.len() as u32;
    MoviePage {
        page: 1,
        results,
        total_pages: 1,
        total_results: total,
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn popular(&self, page: u32) -> Result<MoviePage> {
        self.popular_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        let base = u64::from(page) * 100;
        Ok(MoviePage {
            page,
            results: vec![movie(base + 1, "Popular A"), movie(base + 2, "Popular B")],
            total_pages: 5,
            total_results: 10,
        })
    }

    async fn search(&self, query: &str) -> Result<MoviePage> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(single_page(vec![movie(550, query)]))
    }

    async fn movie_detail(&self, movie_id: u64) -> Result<MovieDetail> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if movie_id == 404 {
            return Err(Error::NotFound(format!("movie {}", movie_id)));
        }
        Ok(MovieDetail {
            id: movie_id,
            title: "Fight Club".to_string(),
            poster_path: None,
            backdrop_path: None,
            overview: String::new(),
            release_date: "1999-10-15".to_string(),
            vote_average: 8.4,
            popularity: 61.4,
            genres: vec![],
            runtime: 139,
            status: "Released".to_string(),
            tagline: "Mischief. Mayhem. Soap.".to_string(),
            budget: 63_000_000,
            revenue: 100_853_753,
            production_companies: vec![],
        })
    }

    async fn set_favorite(&self, movie_id: u64, favorite: bool) -> Result<FavoriteAck> {
        self.set_favorite_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.fail_set_favorite.load(Ordering::SeqCst) {
            return Err(Error::Network("connection reset".to_string()));
        }

        let mut remote = self.remote_favorites.lock().unwrap();
        remote.retain(|&id| id != movie_id);
        if favorite {
            remote.insert(0, movie_id);
        }
        Ok(FavoriteAck {
            status_code: if favorite { 1 } else { 13 },
            status_message: "Success.".to_string(),
        })
    }

    async fn favorite_movies(&self, page: u32) -> Result<MoviePage> {
        self.favorite_list_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        let ids = self.remote();
        let total_pages = ids.len().div_ceil(FAVORITES_PAGE_SIZE).max(1) as u32;
        let start = (page.max(1) as usize - 1) * FAVORITES_PAGE_SIZE;
        let results = ids
            .iter()
            .skip(start)
            .take(FAVORITES_PAGE_SIZE)
            .map(|&id| movie(id, "Favorite"))
            .collect();
        Ok(MoviePage {
            page,
            results,
            total_pages,
            total_results: ids.len() as u32,
        })
    }
}

pub fn catalog(policy: CachePolicy) -> Arc<Catalog<FakeCatalog>> {
    Arc::new(Catalog::new(FakeCatalog::default(), policy))
}

pub fn favorites() -> Favorites<FakeCatalog, MemoryStore> {
    Favorites::new(
        catalog(CachePolicy::default()),
        LocalStore::new(MemoryStore::new()),
    )
}

pub fn memo_input(title: &str, content: &str, watched_at: &str) -> MemoInput {
    MemoInput {
        title: title.to_string(),
        content: content.to_string(),
        watched_at: watched_at.to_string(),
    }
}

pub fn fight_club_memo() -> MemoInput {
    memo_input("Fight Club note", "Loved it!!", "2024-03-01")
}
