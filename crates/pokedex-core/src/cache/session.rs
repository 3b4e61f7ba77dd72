use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use tracing::debug;

use crate::models::{CatalogEntry, Pokemon, PokemonId};

/// Cached data is treated as absent once the shared clock is older than this.
pub const FRESHNESS_WINDOW_MINUTES: i64 = 30;

/// The full catalog index as of the last load.
#[derive(Debug, Clone)]
pub struct IndexSnapshot {
    pub entries: Arc<[CatalogEntry]>,
    pub total_count: u64,
}

/// One immutable version of the cache.
///
/// The index is either empty or complete. A single `last_refreshed_at` clock
/// gates both the index and every detail record.
#[derive(Debug, Clone)]
pub struct CacheState {
    index: Arc<[CatalogEntry]>,
    total_count: u64,
    details: Arc<HashMap<PokemonId, Arc<Pokemon>>>,
    last_refreshed_at: DateTime<Utc>,
}

impl CacheState {
    pub fn empty_at(now: DateTime<Utc>) -> Self {
        Self {
            index: Arc::from(Vec::new()),
            total_count: 0,
            details: Arc::new(HashMap::new()),
            last_refreshed_at: now,
        }
    }

    pub fn last_refreshed_at(&self) -> DateTime<Utc> {
        self.last_refreshed_at
    }

    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now - self.last_refreshed_at <= Duration::minutes(FRESHNESS_WINDOW_MINUTES)
    }

    pub fn has_index(&self) -> bool {
        !self.index.is_empty()
    }

    pub fn is_index_fresh_at(&self, now: DateTime<Utc>) -> bool {
        self.has_index() && self.is_fresh_at(now)
    }

    pub fn index_at(&self, now: DateTime<Utc>) -> Option<IndexSnapshot> {
        if !self.is_index_fresh_at(now) {
            return None;
        }
        Some(IndexSnapshot {
            entries: Arc::clone(&self.index),
            total_count: self.total_count,
        })
    }

    pub fn detail_at(&self, id: PokemonId, now: DateTime<Utc>) -> Option<Arc<Pokemon>> {
        if !self.is_fresh_at(now) {
            return None;
        }
        self.details.get(&id).cloned()
    }

    pub fn detail_count(&self) -> usize {
        self.details.len()
    }

    pub fn age_minutes_at(&self, now: DateTime<Utc>) -> i64 {
        (now - self.last_refreshed_at).num_minutes()
    }

    pub fn age_display_at(&self, now: DateTime<Utc>) -> String {
        let minutes = self.age_minutes_at(now);
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        }
    }

    /// Records stored under an expired clock are dropped rather than revived.
    fn with_index(&self, entries: Vec<CatalogEntry>, total_count: u64, now: DateTime<Utc>) -> Self {
        let details = if self.is_fresh_at(now) {
            Arc::clone(&self.details)
        } else {
            Arc::new(HashMap::new())
        };
        Self {
            index: Arc::from(entries),
            total_count,
            details,
            last_refreshed_at: now,
        }
    }

    fn with_details(&self, records: impl IntoIterator<Item = Arc<Pokemon>>) -> Self {
        let mut details = HashMap::clone(&self.details);
        for record in records {
            details.insert(record.id, record);
        }
        Self {
            index: Arc::clone(&self.index),
            total_count: self.total_count,
            details: Arc::new(details),
            last_refreshed_at: self.last_refreshed_at,
        }
    }
}

/// Session-lifetime cache of the catalog index and fetched detail records.
///
/// Clone is cheap and every clone shares the same store. Mutations build a
/// complete new `CacheState` from the current one and publish it in a single
/// swap, so readers never observe a half-applied update. The lock is never
/// held across an await point.
#[derive(Debug, Clone)]
pub struct SessionCache {
    state: Arc<RwLock<Arc<CacheState>>>,
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionCache {
    pub fn new() -> Self {
        Self::from_state(CacheState::empty_at(Utc::now()))
    }

    pub fn from_state(state: CacheState) -> Self {
        Self {
            state: Arc::new(RwLock::new(Arc::new(state))),
        }
    }

    /// The current published version of the cache.
    pub fn snapshot(&self) -> Arc<CacheState> {
        Arc::clone(&self.state.read())
    }

    fn publish(&self, update: impl FnOnce(&CacheState) -> CacheState) {
        let mut guard = self.state.write();
        let next = update(&guard);
        *guard = Arc::new(next);
    }

    // ===== Index =====

    pub fn is_index_fresh(&self) -> bool {
        self.snapshot().is_index_fresh_at(Utc::now())
    }

    pub fn index(&self) -> Option<IndexSnapshot> {
        self.snapshot().index_at(Utc::now())
    }

    /// Replace the index and reset the shared clock.
    pub fn set_index(&self, entries: Vec<CatalogEntry>, total_count: u64) {
        self.set_index_at(entries, total_count, Utc::now());
    }

    pub fn set_index_at(&self, entries: Vec<CatalogEntry>, total_count: u64, now: DateTime<Utc>) {
        debug!(entries = entries.len(), total_count, "Publishing catalog index");
        self.publish(|prev| prev.with_index(entries, total_count, now));
    }

    // ===== Details =====

    pub fn detail(&self, id: PokemonId) -> Option<Arc<Pokemon>> {
        self.snapshot().detail_at(id, Utc::now())
    }

    /// Upsert one record under the given id. Does not touch the clock.
    pub fn put_detail(&self, id: PokemonId, mut record: Pokemon) {
        record.id = id;
        self.put_details(std::iter::once(record));
    }

    /// Upsert many records keyed by their own ids. Does not touch the clock.
    pub fn put_details(&self, records: impl IntoIterator<Item = Pokemon>) {
        self.put_shared_details(records.into_iter().map(Arc::new));
    }

    /// Like `put_details`, for records the caller also keeps a handle to.
    pub fn put_shared_details(&self, records: impl IntoIterator<Item = Arc<Pokemon>>) {
        self.publish(|prev| prev.with_details(records));
    }

    // ===== Lifecycle =====

    /// Reset to the empty state with the clock set to now.
    pub fn clear(&self) {
        self.clear_at(Utc::now());
    }

    pub fn clear_at(&self, now: DateTime<Utc>) {
        debug!("Clearing session cache");
        self.publish(|_| CacheState::empty_at(now));
    }

    pub fn age_display(&self) -> String {
        self.snapshot().age_display_at(Utc::now())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sprites;

    fn entry(id: u32, name: &str) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            url: format!("https://pokeapi.co/api/v2/pokemon/{}/", id),
        }
    }

    fn record(id: u32, name: &str) -> Pokemon {
        Pokemon {
            id: PokemonId(id),
            name: name.to_string(),
            height: 7,
            weight: 69,
            sprites: Sprites::default(),
            types: vec!["grass".to_string()],
            stats: vec![],
        }
    }

    fn cache_created(minutes_ago: i64) -> SessionCache {
        SessionCache::from_state(CacheState::empty_at(Utc::now() - Duration::minutes(minutes_ago)))
    }

    #[test]
    fn test_new_cache_has_no_index() {
        let cache = SessionCache::new();
        assert!(!cache.is_index_fresh());
        assert!(cache.index().is_none());
        assert!(cache.detail(PokemonId(1)).is_none());
    }

    #[test]
    fn test_set_index_is_fresh() {
        let cache = SessionCache::new();
        cache.set_index(vec![entry(1, "bulbasaur"), entry(2, "ivysaur")], 1302);

        assert!(cache.is_index_fresh());
        let index = cache.index().expect("fresh index");
        assert_eq!(index.entries.len(), 2);
        assert_eq!(index.total_count, 1302);
        assert_eq!(index.entries[1].name, "ivysaur");
    }

    #[test]
    fn test_empty_index_is_never_fresh() {
        let cache = SessionCache::new();
        cache.set_index(vec![], 0);
        assert!(!cache.is_index_fresh());
        assert!(cache.index().is_none());
    }

    #[test]
    fn test_detail_round_trip_while_fresh() {
        let cache = SessionCache::new();
        let r = record(25, "pikachu");
        cache.put_detail(PokemonId(25), r.clone());

        assert_eq!(cache.detail(PokemonId(25)).as_deref(), Some(&r));
    }

    #[test]
    fn test_detail_absent_once_stale() {
        let cache = cache_created(FRESHNESS_WINDOW_MINUTES + 1);
        cache.put_detail(PokemonId(25), record(25, "pikachu"));

        assert!(cache.detail(PokemonId(25)).is_none());
        // The record is still stored, only hidden by the clock
        assert_eq!(cache.snapshot().detail_count(), 1);
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let created = Utc::now();
        let state = CacheState::empty_at(created);
        assert!(state.is_fresh_at(created + Duration::minutes(FRESHNESS_WINDOW_MINUTES)));
        assert!(!state.is_fresh_at(created + Duration::minutes(FRESHNESS_WINDOW_MINUTES) + Duration::seconds(1)));
    }

    #[test]
    fn test_put_detail_does_not_touch_clock() {
        let cache = cache_created(10);
        let before = cache.snapshot().last_refreshed_at();
        cache.put_details(vec![record(1, "bulbasaur"), record(4, "charmander")]);
        assert_eq!(cache.snapshot().last_refreshed_at(), before);
    }

    #[test]
    fn test_set_index_after_expiry_drops_details() {
        let cache = cache_created(FRESHNESS_WINDOW_MINUTES + 5);
        cache.put_detail(PokemonId(4), record(4, "charmander"));
        assert!(cache.detail(PokemonId(4)).is_none());

        cache.set_index(vec![entry(4, "charmander")], 1);
        assert!(cache.is_index_fresh());
        assert!(cache.detail(PokemonId(4)).is_none());
        assert_eq!(cache.snapshot().detail_count(), 0);
    }

    #[test]
    fn test_set_index_within_window_keeps_details() {
        let cache = cache_created(10);
        cache.put_detail(PokemonId(4), record(4, "charmander"));

        cache.set_index(vec![entry(4, "charmander")], 1);
        assert!(cache.detail(PokemonId(4)).is_some());
        assert!(cache.snapshot().age_minutes_at(Utc::now()) < 1);
    }

    #[test]
    fn test_index_expires_with_clock() {
        let cache = SessionCache::new();
        let loaded_at = Utc::now() - Duration::minutes(FRESHNESS_WINDOW_MINUTES + 1);
        cache.set_index_at(vec![entry(1, "bulbasaur")], 1, loaded_at);

        assert!(!cache.is_index_fresh());
        assert!(cache.index().is_none());
        assert!(cache.snapshot().has_index());
    }

    #[test]
    fn test_insert_existing_id_overwrites() {
        let cache = SessionCache::new();
        cache.put_detail(PokemonId(1), record(1, "bulbasaur"));
        cache.put_details(vec![record(1, "bulbasaur-updated")]);

        assert_eq!(cache.snapshot().detail_count(), 1);
        assert_eq!(cache.detail(PokemonId(1)).unwrap().name, "bulbasaur-updated");
    }

    #[test]
    fn test_put_detail_keys_by_given_id() {
        let cache = SessionCache::new();
        cache.put_detail(PokemonId(7), record(99, "squirtle"));
        assert_eq!(cache.detail(PokemonId(7)).unwrap().id, PokemonId(7));
        assert!(cache.detail(PokemonId(99)).is_none());
    }

    #[test]
    fn test_clear_resets_everything() {
        let cache = cache_created(FRESHNESS_WINDOW_MINUTES + 1);
        cache.set_index(vec![entry(1, "bulbasaur")], 1);
        cache.put_detail(PokemonId(1), record(1, "bulbasaur"));

        cache.clear();

        let snapshot = cache.snapshot();
        assert!(!snapshot.has_index());
        assert_eq!(snapshot.detail_count(), 0);
        assert!(snapshot.is_fresh_at(Utc::now()));
    }

    #[test]
    fn test_snapshots_are_immutable() {
        let cache = SessionCache::new();
        let before = cache.snapshot();
        cache.put_detail(PokemonId(1), record(1, "bulbasaur"));

        assert_eq!(before.detail_count(), 0);
        assert_eq!(cache.snapshot().detail_count(), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let cache = SessionCache::new();
        let handle = cache.clone();
        handle.put_detail(PokemonId(1), record(1, "bulbasaur"));
        assert!(cache.detail(PokemonId(1)).is_some());
    }

    #[test]
    fn test_age_display() {
        let now = Utc::now();
        let at = |minutes: i64| CacheState::empty_at(now - Duration::minutes(minutes)).age_display_at(now);
        assert_eq!(at(0), "just now");
        assert_eq!(at(-5), "just now");
        assert_eq!(at(5), "5m ago");
        assert_eq!(at(60), "1h ago");
        assert_eq!(at(95), "2h ago");
    }
}
