//! Read-through query cache over the remote catalog.
//!
//! Each cache maps a key to the last successful value, when it was fetched,
//! and the request currently in flight. Concurrent reads of the same key
//! share one request. There are no refresh timers: a stale entry is
//! refetched only when somebody reads it.

use crate::models::config::CacheSettings;
use crate::models::movie::{FavoriteAck, Movie, MovieDetail, MoviePage};
use crate::services::tmdb::{validate_query, CatalogApi};
use crate::Result;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

type SharedFetch<V> = Shared<BoxFuture<'static, Result<V>>>;

struct Entry<V> {
    value: Option<V>,
    fetched_at: Option<Instant>,
    inflight: Option<SharedFetch<V>>,
    /// Bumped on every new request and on invalidation, so a request that
    /// was overtaken never writes its result.
    generation: u64,
}

impl<V> Default for Entry<V> {
    fn default() -> Self {
        Self {
            value: None,
            fetched_at: None,
            inflight: None,
            generation: 0,
        }
    }
}

/// A keyed cache with request coalescing and a staleness window.
pub struct QueryCache<K, V> {
    name: &'static str,
    stale_time: Duration,
    entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone + Send + Sync + 'static,
{
    /// A zero `stale_time` means every read fetches (still coalesced).
    pub fn new(name: &'static str, stale_time: Duration) -> Self {
        Self {
            name,
            stale_time,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    /// Return a fresh cached value, join the request in flight, or start one.
    pub async fn fetch<F, Fut>(&self, key: K, fetch: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let (request, generation) = {
            let mut entries = self.lock();
            let entry = entries.entry(key.clone()).or_default();

            if let (Some(value), Some(fetched_at)) = (&entry.value, entry.fetched_at) {
                if fetched_at.elapsed() < self.stale_time {
                    tracing::debug!("{} cache hit: {:?}", self.name, key);
                    return Ok(value.clone());
                }
            }

            match entry.inflight.clone() {
                Some(inflight) => {
                    tracing::debug!("{} joining request in flight: {:?}", self.name, key);
                    (inflight, entry.generation)
                }
                None => {
                    tracing::debug!("{} fetching: {:?}", self.name, key);
                    let request = fetch().boxed().shared();
                    entry.generation += 1;
                    entry.inflight = Some(request.clone());
                    (request, entry.generation)
                }
            }
        };

        let result = request.await;
        self.settle(&key, generation, &result);
        result
    }

    /// Last successful value, fresh or not, without fetching.
    pub fn cached(&self, key: &K) -> Option<V> {
        self.lock().get(key).and_then(|e| e.value.clone())
    }

    /// Drop one entry so the next read refetches.
    pub fn invalidate(&self, key: &K) {
        if let Some(entry) = self.lock().get_mut(key) {
            Self::reset(entry);
        }
    }

    /// Drop every entry.
    pub fn invalidate_all(&self) {
        for entry in self.lock().values_mut() {
            Self::reset(entry);
        }
        tracing::debug!("{} cache invalidated", self.name);
    }

    fn reset(entry: &mut Entry<V>) {
        entry.value = None;
        entry.fetched_at = None;
        entry.inflight = None;
        entry.generation += 1;
    }

    /// Record a finished request, unless it was invalidated or already settled.
    fn settle(&self, key: &K, generation: u64, result: &Result<V>) {
        let mut entries = self.lock();
        let Some(entry) = entries.get_mut(key) else {
            return;
        };
        if entry.generation != generation || entry.inflight.is_none() {
            return;
        }

        entry.inflight = None;
        match result {
            Ok(value) => {
                entry.value = Some(value.clone());
                entry.fetched_at = Some(Instant::now());
            }
            Err(e) => tracing::debug!("{} fetch failed for {:?}: {}", self.name, key, e),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, Entry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Staleness windows for each kind of query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub detail_stale: Duration,
    pub list_stale: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            detail_stale: Duration::from_secs(60 * 60),
            list_stale: Duration::ZERO,
        }
    }
}

impl From<&CacheSettings> for CachePolicy {
    fn from(settings: &CacheSettings) -> Self {
        Self {
            detail_stale: Duration::from_secs(settings.detail_stale_secs),
            list_stale: Duration::from_secs(settings.list_stale_secs),
        }
    }
}

/// Cached access to a catalog client.
pub struct Catalog<C> {
    client: Arc<C>,
    popular: QueryCache<u32, MoviePage>,
    search: QueryCache<String, MoviePage>,
    details: QueryCache<u64, MovieDetail>,
    favorites: QueryCache<u32, MoviePage>,
}

impl<C: CatalogApi> Catalog<C> {
    pub fn new(client: C, policy: CachePolicy) -> Self {
        Self {
            client: Arc::new(client),
            popular: QueryCache::new("popular", policy.list_stale),
            search: QueryCache::new("search", policy.list_stale),
            details: QueryCache::new("detail", policy.detail_stale),
            favorites: QueryCache::new("favorites", policy.list_stale),
        }
    }

    /// The wrapped client.
    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn popular(&self, page: u32) -> Result<MoviePage> {
        let client = Arc::clone(&self.client);
        self.popular
            .fetch(page, move || async move { client.popular(page).await })
            .await
    }

    /// Search by title. Blank queries fail before touching cache or network.
    pub async fn search(&self, query: &str) -> Result<MoviePage> {
        validate_query(query)?;
        let client = Arc::clone(&self.client);
        let owned = query.to_string();
        self.search
            .fetch(query.to_string(), move || async move { client.search(&owned).await })
            .await
    }

    pub async fn detail(&self, movie_id: u64) -> Result<MovieDetail> {
        let client = Arc::clone(&self.client);
        self.details
            .fetch(movie_id, move || async move { client.movie_detail(movie_id).await })
            .await
    }

    /// One page of the account favorites.
    pub async fn favorites(&self, page: u32) -> Result<MoviePage> {
        let client = Arc::clone(&self.client);
        self.favorites
            .fetch(page, move || async move { client.favorite_movies(page).await })
            .await
    }

    /// Every page of the account favorites, in remote order.
    pub async fn all_favorites(&self) -> Result<Vec<Movie>> {
        let mut movies = Vec::new();
        let mut page = 1;
        loop {
            let current = self.favorites(page).await?;
            let has_next = current.has_next();
            movies.extend(current.results);
            if !has_next {
                break;
            }
            page += 1;
        }
        Ok(movies)
    }

    /// Write a favorite flag remotely. On success the favorites list is
    /// invalidated so the next read refetches it.
    pub async fn set_favorite(&self, movie_id: u64, favorite: bool) -> Result<FavoriteAck> {
        let ack = self.client.set_favorite(movie_id, favorite).await?;
        self.favorites.invalidate_all();
        Ok(ack)
    }

    /// Last fetched detail, without any request.
    pub fn cached_detail(&self, movie_id: u64) -> Option<MovieDetail> {
        self.details.cached(&movie_id)
    }

    /// Forget everything cached.
    pub fn invalidate_all(&self) {
        self.popular.invalidate_all();
        self.search.invalidate_all();
        self.details.invalidate_all();
        self.favorites.invalidate_all();
    }
}
