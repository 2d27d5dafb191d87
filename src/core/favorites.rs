//! Favorite and memo synchronization.
//!
//! Keeps three things in step: the account favorites on TMDB, the local
//! favorite-id set, and the local memos. The local set answers every
//! synchronous "is this a favorite" question; `reconcile` pulls the remote
//! list back into it.
//!
//! Two inconsistency windows are accepted and never rolled back:
//! a memo saved for an add whose remote call failed, and a removal that
//! cleared local state although the remote call failed.

use crate::core::query::Catalog;
use crate::core::store::{KeyValueStore, LocalStore};
use crate::models::memo::{Memo, MemoInput};
use crate::services::tmdb::CatalogApi;
use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Favorite state of one movie as seen by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteState {
    NotFavorite,
    /// Memo saved, remote add in flight.
    Adding,
    Favorite,
    /// Remote removal in flight.
    Removing,
}

impl FavoriteState {
    /// Whether a transition is pending.
    pub fn is_pending(self) -> bool {
        matches!(self, FavoriteState::Adding | FavoriteState::Removing)
    }
}

impl fmt::Display for FavoriteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FavoriteState::NotFavorite => "not a favorite",
            FavoriteState::Adding => "being added",
            FavoriteState::Favorite => "a favorite",
            FavoriteState::Removing => "being removed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Adding,
    Removing,
}

type PendingMap = Mutex<HashMap<u64, Transition>>;

/// Marks a movie as mid-transition until dropped.
struct PendingGuard<'a> {
    pending: &'a PendingMap,
    movie_id: u64,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        lock(self.pending).remove(&self.movie_id);
    }
}

fn lock(pending: &PendingMap) -> MutexGuard<'_, HashMap<u64, Transition>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Outcome of pulling the remote favorites list into the local set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Remote favorites that were missing locally.
    pub added: Vec<u64>,
    /// Local favorites the remote list no longer has.
    pub removed: Vec<u64>,
    /// Movies with a memo but no favorite after reconciling.
    pub orphaned_memos: Vec<u64>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.orphaned_memos.is_empty()
    }
}

/// Favorite/memo synchronizer.
pub struct Favorites<C, S> {
    catalog: Arc<Catalog<C>>,
    store: LocalStore<S>,
    pending: PendingMap,
}

impl<C: CatalogApi, S: KeyValueStore> Favorites<C, S> {
    pub fn new(catalog: Arc<Catalog<C>>, store: LocalStore<S>) -> Self {
        Self {
            catalog,
            store,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &Catalog<C> {
        &self.catalog
    }

    pub fn store(&self) -> &LocalStore<S> {
        &self.store
    }

    /// Current state, from local data only.
    pub fn state(&self, movie_id: u64) -> FavoriteState {
        match lock(&self.pending).get(&movie_id) {
            Some(Transition::Adding) => FavoriteState::Adding,
            Some(Transition::Removing) => FavoriteState::Removing,
            None if self.store.is_favorite(movie_id) => FavoriteState::Favorite,
            None => FavoriteState::NotFavorite,
        }
    }

    /// Whether the movie is a favorite according to the local set.
    /// Never waits on the network.
    pub fn is_favorite_now(&self, movie_id: u64) -> bool {
        self.store.is_favorite(movie_id)
    }

    /// The local memo for a movie.
    pub fn memo_for(&self, movie_id: u64) -> Option<Memo> {
        self.store.get_memo(movie_id)
    }

    /// Favorite a movie with the memo the user submitted.
    ///
    /// The memo is validated, then saved locally before the remote call.
    /// It stays saved if the remote call fails.
    pub async fn add_favorite(&self, movie_id: u64, input: MemoInput) -> Result<Memo> {
        let memo = Memo::new(movie_id, input)?;
        let _guard = self.begin(movie_id, Transition::Adding)?;

        self.store.put_memo(&memo);

        match self.catalog.set_favorite(movie_id, true).await {
            Ok(_) => {
                self.store.set_favorite_id(movie_id, true);
                tracing::info!("Movie {} added to favorites", movie_id);
                Ok(memo)
            }
            Err(e) => {
                tracing::warn!(
                    "Remote favorite failed for movie {}, memo kept locally: {}",
                    movie_id,
                    e
                );
                Err(e)
            }
        }
    }

    /// Unfavorite a movie. Callers confirm with the user first.
    ///
    /// The memo and local favorite id are cleared whatever the remote
    /// outcome; a remote failure is still returned.
    pub async fn remove_favorite(&self, movie_id: u64) -> Result<()> {
        let _guard = self.begin(movie_id, Transition::Removing)?;

        let remote = self.catalog.set_favorite(movie_id, false);
        self.store.remove_memo(movie_id);
        self.store.set_favorite_id(movie_id, false);

        match remote.await {
            Ok(_) => {
                tracing::info!("Movie {} removed from favorites", movie_id);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    "Remote unfavorite failed for movie {}, local state cleared: {}",
                    movie_id,
                    e
                );
                Err(e)
            }
        }
    }

    /// Rewrite the memo of a movie that is already a favorite.
    /// Keeps the memo id and creation time when one exists.
    pub fn update_memo(&self, movie_id: u64, input: MemoInput) -> Result<Memo> {
        let state = self.state(movie_id);
        if state != FavoriteState::Favorite {
            return Err(Error::InvalidTransition {
                movie_id,
                state: state.to_string(),
            });
        }

        let memo = match self.store.get_memo(movie_id) {
            Some(existing) => existing.revise(input)?,
            None => Memo::new(movie_id, input)?,
        };
        self.store.put_memo(&memo);
        Ok(memo)
    }

    /// Replace the local favorite set with the remote favorites list.
    /// Movies with a pending transition keep their local membership.
    pub async fn reconcile(&self) -> Result<ReconcileReport> {
        let remote: Vec<u64> = self
            .catalog
            .all_favorites()
            .await?
            .iter()
            .map(|m| m.id)
            .collect();
        let local = self.store.favorite_ids();
        let pending: Vec<u64> = lock(&self.pending).keys().copied().collect();

        let mut merged: Vec<u64> = remote
            .iter()
            .copied()
            .filter(|id| !pending.contains(id))
            .collect();
        merged.extend(local.iter().copied().filter(|id| pending.contains(id)));

        let report = ReconcileReport {
            added: merged.iter().copied().filter(|id| !local.contains(id)).collect(),
            removed: local.iter().copied().filter(|id| !merged.contains(id)).collect(),
            orphaned_memos: self
                .store
                .list_memos()
                .iter()
                .map(|m| m.movie_id)
                .filter(|id| !merged.contains(id))
                .collect(),
        };

        self.store.replace_favorite_ids(&merged);
        tracing::info!(
            "Reconciled favorites: {} remote, {} added, {} removed",
            remote.len(),
            report.added.len(),
            report.removed.len()
        );
        Ok(report)
    }

    /// Reserve the movie for one transition.
    ///
    /// A second transition while one is pending is rejected, as is adding a
    /// movie that is already a favorite. Removal is allowed from any settled
    /// state so remote-only favorites can be cleared.
    fn begin(&self, movie_id: u64, transition: Transition) -> Result<PendingGuard<'_>> {
        let mut pending = lock(&self.pending);
        if pending.contains_key(&movie_id) {
            return Err(Error::TransitionInProgress(movie_id));
        }
        if transition == Transition::Adding && self.store.is_favorite(movie_id) {
            return Err(Error::InvalidTransition {
                movie_id,
                state: FavoriteState::Favorite.to_string(),
            });
        }

        pending.insert(movie_id, transition);
        Ok(PendingGuard {
            pending: &self.pending,
            movie_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_labels() {
        assert_eq!(FavoriteState::Favorite.to_string(), "a favorite");
        assert_eq!(FavoriteState::Removing.to_string(), "being removed");
    }

    #[test]
    fn test_pending_states() {
        assert!(FavoriteState::Adding.is_pending());
        assert!(FavoriteState::Removing.is_pending());
        assert!(!FavoriteState::Favorite.is_pending());
        assert!(!FavoriteState::NotFavorite.is_pending());
    }

    #[test]
    fn test_report_is_clean() {
        assert!(ReconcileReport::default().is_clean());
        let report = ReconcileReport {
            orphaned_memos: vec![550],
            ..ReconcileReport::default()
        };
        assert!(!report.is_clean());
    }
}
