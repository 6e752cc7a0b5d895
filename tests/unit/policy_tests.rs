// Cache policy unit tests

use netcache::cache::CacheResult;
use netcache::policy::*;

#[test]
fn test_default_mode_is_update_immediately_if_expired() {
    assert_eq!(CacheMode::default(), CacheMode::UpdateImmediatelyIfExpired);
}

#[test]
fn test_entry_state_from_cache_result() {
    let miss: CacheResult<String> = CacheResult::miss();
    assert_eq!(EntryState::of(&miss), EntryState::Absent);

    let fresh = CacheResult::hit("v".to_string(), false);
    assert_eq!(EntryState::of(&fresh), EntryState::Fresh);

    let expired = CacheResult::hit("v".to_string(), true);
    assert_eq!(EntryState::of(&expired), EntryState::Expired);
    assert!(EntryState::Expired.exists());
    assert!(!EntryState::Absent.exists());
}

#[test]
fn test_offline_never_touches_network() {
    // Test: without connectivity every mode serves from cache only
    for mode in CacheMode::ALL {
        for entry in [EntryState::Absent, EntryState::Fresh, EntryState::Expired] {
            let plan = resolve(mode, entry, false);
            assert_eq!(plan, ActionPlan::ServeCacheOnly, "{} {:?}", mode, entry);
            assert!(!plan.touches_network());
        }
    }
}

#[test]
fn test_skip_always_fetches_without_storing() {
    for entry in [EntryState::Absent, EntryState::Fresh, EntryState::Expired] {
        assert_eq!(
            resolve(CacheMode::Skip, entry, true),
            ActionPlan::FetchThenServe {
                store: StoreWrite::None
            }
        );
    }
}

#[test]
fn test_fresh_entry_with_if_expired_modes_is_served_directly() {
    for mode in [
        CacheMode::UpdateAsyncIfExpired,
        CacheMode::UpdateImmediatelyIfExpired,
    ] {
        assert_eq!(
            resolve(mode, EntryState::Fresh, true),
            ActionPlan::ServeCacheOnly
        );
    }
}

#[test]
fn test_async_modes_with_existing_entry_refresh_in_background() {
    assert_eq!(
        resolve(CacheMode::UpdateAsync, EntryState::Fresh, true),
        ActionPlan::ServeCacheThenRefresh
    );
    assert_eq!(
        resolve(CacheMode::UpdateAsync, EntryState::Expired, true),
        ActionPlan::ServeCacheThenRefresh
    );
    assert_eq!(
        resolve(CacheMode::UpdateAsyncIfExpired, EntryState::Expired, true),
        ActionPlan::ServeCacheThenRefresh
    );
}

#[test]
fn test_async_modes_without_entry_fetch_and_store_detached() {
    for mode in [CacheMode::UpdateAsync, CacheMode::UpdateAsyncIfExpired] {
        assert_eq!(
            resolve(mode, EntryState::Absent, true),
            ActionPlan::FetchThenServe {
                store: StoreWrite::Detached
            }
        );
    }
}

#[test]
fn test_immediate_modes_store_before_returning() {
    for entry in [EntryState::Absent, EntryState::Fresh, EntryState::Expired] {
        assert_eq!(
            resolve(CacheMode::UpdateImmediately, entry, true),
            ActionPlan::FetchThenServe {
                store: StoreWrite::Await
            }
        );
    }
    for entry in [EntryState::Absent, EntryState::Expired] {
        assert_eq!(
            resolve(CacheMode::UpdateImmediatelyIfExpired, entry, true),
            ActionPlan::FetchThenServe {
                store: StoreWrite::Await
            }
        );
    }
}
