//! Cache policy resolution
//!
//! `resolve` is a pure function of the requested mode, the state of the
//! cached entry, and connectivity. It performs no I/O.

use super::mode::CacheMode;
use crate::cache::CacheResult;

/// State of the cached entry for a key at lookup time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Absent,
    Fresh,
    Expired,
}

impl EntryState {
    pub fn from_flags(exists: bool, expired: bool) -> Self {
        match (exists, expired) {
            (false, _) => EntryState::Absent,
            (true, false) => EntryState::Fresh,
            (true, true) => EntryState::Expired,
        }
    }

    pub fn of<T>(result: &CacheResult<T>) -> Self {
        Self::from_flags(result.exists, result.expired)
    }

    pub fn exists(&self) -> bool {
        !matches!(self, EntryState::Absent)
    }
}

/// What happens to a fetched payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreWrite {
    /// Never written (`Skip`)
    None,
    /// Written before the caller gets its result
    Await,
    /// Written by a detached task
    Detached,
}

/// Plan the fetch pipeline executes for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPlan {
    /// Answer from the cache; no network, no store write
    ServeCacheOnly,
    /// Fetch before returning; fall back to the cached entry on failure
    FetchThenServe { store: StoreWrite },
    /// Answer from the cache now, refresh it with a detached fetch
    ServeCacheThenRefresh,
}

impl ActionPlan {
    pub fn touches_network(&self) -> bool {
        !matches!(self, ActionPlan::ServeCacheOnly)
    }
}

/// Map mode, entry state and connectivity to a plan
pub fn resolve(mode: CacheMode, entry: EntryState, connection_available: bool) -> ActionPlan {
    if !connection_available {
        return ActionPlan::ServeCacheOnly;
    }

    match (mode, entry) {
        (CacheMode::Skip, _) => ActionPlan::FetchThenServe {
            store: StoreWrite::None,
        },

        (CacheMode::UpdateAsync | CacheMode::UpdateAsyncIfExpired, EntryState::Absent) => {
            ActionPlan::FetchThenServe {
                store: StoreWrite::Detached,
            }
        }
        (CacheMode::UpdateAsync, _) => ActionPlan::ServeCacheThenRefresh,
        (CacheMode::UpdateAsyncIfExpired, EntryState::Fresh) => ActionPlan::ServeCacheOnly,
        (CacheMode::UpdateAsyncIfExpired, EntryState::Expired) => {
            ActionPlan::ServeCacheThenRefresh
        }

        (CacheMode::UpdateImmediately, _) => ActionPlan::FetchThenServe {
            store: StoreWrite::Await,
        },
        (CacheMode::UpdateImmediatelyIfExpired, EntryState::Fresh) => ActionPlan::ServeCacheOnly,
        (CacheMode::UpdateImmediatelyIfExpired, _) => ActionPlan::FetchThenServe {
            store: StoreWrite::Await,
        },
    }
}
