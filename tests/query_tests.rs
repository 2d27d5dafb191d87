//! Integration tests for the cached catalog.
//!
//! Tests cover:
//! - Request coalescing for identical keys
//! - Always-stale list queries and the detail staleness window
//! - Validation before any network call
//! - Favorites invalidation after writes

mod common;

use common::{catalog, FakeCatalog};
use movie_memo::core::query::CachePolicy;
use movie_memo::Error;
use std::sync::atomic::Ordering;
use std::time::Duration;

// ========== COALESCING ==========

#[tokio::test]
async fn test_concurrent_popular_requests_share_one_call() {
    let catalog = catalog(CachePolicy::default());

    let (a, b) = tokio::join!(catalog.popular(1), catalog.popular(1));

    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a, b);
    assert_eq!(a.ids(), vec![101, 102]);
    assert_eq!(FakeCatalog::calls(&catalog.client().popular_calls), 1);
}

#[tokio::test]
async fn test_different_pages_are_separate_requests() {
    let catalog = catalog(CachePolicy::default());

    let (a, b) = tokio::join!(catalog.popular(1), catalog.popular(2));

    assert_eq!(a.unwrap().ids(), vec![101, 102]);
    assert_eq!(b.unwrap().ids(), vec![201, 202]);
    assert_eq!(FakeCatalog::calls(&catalog.client().popular_calls), 2);
}

#[tokio::test]
async fn test_popular_is_always_refetched() {
    let catalog = catalog(CachePolicy::default());

    catalog.popular(1).await.unwrap();
    catalog.popular(1).await.unwrap();

    assert_eq!(FakeCatalog::calls(&catalog.client().popular_calls), 2);
}

// ========== SEARCH ==========

#[tokio::test]
async fn test_blank_search_makes_no_call() {
    let catalog = catalog(CachePolicy::default());

    let err = catalog.search("  ").await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(FakeCatalog::calls(&catalog.client().search_calls), 0);
}

#[tokio::test]
async fn test_concurrent_identical_searches_coalesce() {
    let catalog = catalog(CachePolicy::default());

    let (a, b, c) = tokio::join!(
        catalog.search("fight club"),
        catalog.search("fight club"),
        catalog.search("parasite"),
    );

    assert_eq!(a.unwrap().results[0].title, "fight club");
    assert_eq!(b.unwrap().results[0].title, "fight club");
    assert_eq!(c.unwrap().results[0].title, "parasite");
    assert_eq!(FakeCatalog::calls(&catalog.client().search_calls), 2);
}

// ========== DETAIL ==========

#[tokio::test(start_paused = true)]
async fn test_detail_cached_for_an_hour() {
    let catalog = catalog(CachePolicy::default());

    catalog.detail(550).await.unwrap();
    tokio::time::advance(Duration::from_secs(30 * 60)).await;
    let cached = catalog.detail(550).await.unwrap();
    assert_eq!(cached.runtime, 139);
    assert_eq!(FakeCatalog::calls(&catalog.client().detail_calls), 1);

    tokio::time::advance(Duration::from_secs(31 * 60)).await;
    catalog.detail(550).await.unwrap();
    assert_eq!(FakeCatalog::calls(&catalog.client().detail_calls), 2);
}

#[tokio::test]
async fn test_detail_not_found_is_not_cached() {
    let catalog = catalog(CachePolicy::default());

    let err = catalog.detail(404).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert!(catalog.cached_detail(404).is_none());

    let _ = catalog.detail(404).await;
    assert_eq!(FakeCatalog::calls(&catalog.client().detail_calls), 2);
}

#[tokio::test]
async fn test_custom_detail_window() {
    let catalog = catalog(CachePolicy {
        detail_stale: Duration::ZERO,
        list_stale: Duration::ZERO,
    });

    catalog.detail(550).await.unwrap();
    catalog.detail(550).await.unwrap();

    assert_eq!(FakeCatalog::calls(&catalog.client().detail_calls), 2);
    assert_eq!(catalog.cached_detail(550).map(|d| d.id), Some(550));
}

// ========== FAVORITES INVALIDATION ==========

fn long_lived_lists() -> CachePolicy {
    CachePolicy {
        detail_stale: Duration::from_secs(3600),
        list_stale: Duration::from_secs(3600),
    }
}

#[tokio::test]
async fn test_set_favorite_invalidates_favorites_list() {
    let catalog = catalog(long_lived_lists());

    assert!(catalog.favorites(1).await.unwrap().results.is_empty());
    catalog.favorites(1).await.unwrap();
    assert_eq!(FakeCatalog::calls(&catalog.client().favorite_list_calls), 1);

    catalog.set_favorite(550, true).await.unwrap();

    let page = catalog.favorites(1).await.unwrap();
    assert_eq!(page.ids(), vec![550]);
    assert_eq!(FakeCatalog::calls(&catalog.client().favorite_list_calls), 2);
}

#[tokio::test]
async fn test_failed_set_favorite_keeps_cache() {
    let catalog = catalog(long_lived_lists());
    catalog.favorites(1).await.unwrap();
    catalog
        .client()
        .fail_set_favorite
        .store(true, Ordering::SeqCst);

    assert!(catalog.set_favorite(550, true).await.is_err());

    catalog.favorites(1).await.unwrap();
    assert_eq!(FakeCatalog::calls(&catalog.client().favorite_list_calls), 1);
}

#[tokio::test]
async fn test_all_favorites_walks_pages() {
    let catalog = catalog(CachePolicy::default());
    catalog.client().set_remote(&[5, 4, 3, 2, 1]);

    let movies = catalog.all_favorites().await.unwrap();

    let ids: Vec<u64> = movies.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![5, 4, 3, 2, 1]);
    assert_eq!(FakeCatalog::calls(&catalog.client().favorite_list_calls), 3);
}

#[tokio::test]
async fn test_invalidate_all() {
    let catalog = catalog(long_lived_lists());
    catalog.detail(550).await.unwrap();

    catalog.invalidate_all();

    assert!(catalog.cached_detail(550).is_none());
    catalog.detail(550).await.unwrap();
    assert_eq!(FakeCatalog::calls(&catalog.client().detail_calls), 2);
}
