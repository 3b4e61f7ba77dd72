//! Display orchestration.
//!
//! This module turns a `ViewQuery` into the page of Pokémon to show:
//! ensure the catalog index is loaded, select the visible entries, resolve
//! their detail records from the cache or the API, and merge them back into
//! visible order.

pub mod pagination;
pub mod sequence;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::cache::{IndexSnapshot, SessionCache};
use crate::models::{CatalogEntry, Pokemon, PokemonId};
use crate::utils::contains_ignore_case;
use crate::view_state::{ViewQuery, PAGE_SIZE};

pub use pagination::{page_numbers, total_pages, PageSlot};
pub use sequence::{LoadSequence, LoadTicket};

/// A failed load, carrying a message fit for the error panel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct LoadError(pub String);

impl From<ApiError> for LoadError {
    fn from(e: ApiError) -> Self {
        LoadError(e.to_string())
    }
}

/// Everything the list screen needs for one (search, page) combination.
#[derive(Debug, Clone)]
pub struct DisplayPage {
    pub query: ViewQuery,
    pub pokemon: Vec<Arc<Pokemon>>,
    pub total_count: u64,
    pub total_pages: u32,
    pub search_active: bool,
}

impl DisplayPage {
    /// Pagination only applies when no search is active and there is
    /// more than one page.
    pub fn show_pagination(&self) -> bool {
        !self.search_active && self.total_pages > 1
    }
}

/// Entries visible for `query`, in index order.
///
/// Without a search term this is the requested page, clipped to the index
/// (empty past the end). With one, it is every entry whose name contains the
/// term, ignoring case and ignoring the page.
pub fn select_visible<'a>(entries: &'a [CatalogEntry], query: &ViewQuery) -> Vec<&'a CatalogEntry> {
    if query.is_search_active() {
        let needle = query.term().to_lowercase();
        return entries
            .iter()
            .filter(|entry| contains_ignore_case(&entry.name, &needle))
            .collect();
    }

    let start = (query.page.max(1) as usize - 1).saturating_mul(PAGE_SIZE);
    entries.iter().skip(start).take(PAGE_SIZE).collect()
}

/// Loads display pages and detail records through the session cache.
///
/// Clone is cheap; clones share the same client and cache.
#[derive(Clone)]
pub struct Orchestrator {
    client: ApiClient,
    cache: SessionCache,
}

impl Orchestrator {
    pub fn new(client: ApiClient, cache: SessionCache) -> Self {
        Self { client, cache }
    }

    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    /// Return the fresh catalog index, loading it if needed.
    ///
    /// A load first probes for the total count, then requests the whole
    /// catalog in one call.
    pub async fn ensure_index(&self) -> Result<IndexSnapshot, LoadError> {
        if let Some(index) = self.cache.index() {
            debug!(entries = index.entries.len(), "Index cache hit");
            return Ok(index);
        }

        info!("Loading catalog index");
        let probe = self.client.list_page(1, 0).await?;
        let full = self.client.list_page(probe.count, 0).await?;

        if full.results.len() as u64 != probe.count {
            warn!(
                expected = probe.count,
                received = full.results.len(),
                "Catalog size changed between probe and full fetch"
            );
        }

        info!(entries = full.results.len(), total_count = probe.count, "Catalog index loaded");
        let snapshot = IndexSnapshot {
            entries: Arc::from(full.results.clone()),
            total_count: probe.count,
        };
        self.cache.set_index(full.results, probe.count);
        Ok(snapshot)
    }

    /// Resolve the display page for `query`.
    pub async fn load_view(&self, query: &ViewQuery) -> Result<DisplayPage, LoadError> {
        let index = self.ensure_index().await?;
        let visible = select_visible(&index.entries, query);
        let ids: Vec<PokemonId> = visible.iter().map(|entry| entry.id()).collect();

        debug!(
            search = query.term(),
            page = query.page,
            visible = ids.len(),
            "Resolving display page"
        );

        let pokemon = self.resolve_details(&ids).await?;

        Ok(DisplayPage {
            query: query.clone(),
            pokemon,
            total_count: index.total_count,
            total_pages: total_pages(index.total_count),
            search_active: query.is_search_active(),
        })
    }

    /// Re-run a failed load.
    ///
    /// Without an index this repeats the index load; otherwise the selection
    /// and detail resolution run again on the cached index.
    pub async fn retry(&self, query: &ViewQuery) -> Result<DisplayPage, LoadError> {
        if self.cache.is_index_fresh() {
            info!("Retrying detail resolution");
        } else {
            info!("Retrying catalog index load");
        }
        self.load_view(query).await
    }

    /// Detail record for a single Pokémon, from the cache when fresh.
    pub async fn load_detail(&self, id: PokemonId) -> Result<Arc<Pokemon>, LoadError> {
        if let Some(record) = self.cache.detail(id) {
            debug!(%id, "Detail cache hit");
            return Ok(record);
        }

        let mut record = self.client.fetch_detail(id).await?;
        if record.id != id {
            warn!(requested = %id, received = %record.id, "Detail record id differs, keeping requested id");
            record.id = id;
        }
        let record = Arc::new(record);
        self.cache.put_shared_details([Arc::clone(&record)]);
        Ok(record)
    }

    /// Map ids to records in the same order, fetching cache misses in one batch.
    async fn resolve_details(&self, ids: &[PokemonId]) -> Result<Vec<Arc<Pokemon>>, LoadError> {
        let snapshot = self.cache.snapshot();
        let now = Utc::now();

        let mut found: HashMap<PokemonId, Arc<Pokemon>> = HashMap::with_capacity(ids.len());
        let mut missing: Vec<PokemonId> = Vec::new();
        for &id in ids {
            if found.contains_key(&id) || missing.contains(&id) {
                continue;
            }
            match snapshot.detail_at(id, now) {
                Some(record) => {
                    found.insert(id, record);
                }
                None => missing.push(id),
            }
        }

        debug!(hits = found.len(), misses = missing.len(), "Detail cache lookup");

        if !missing.is_empty() {
            let fetched: Vec<Arc<Pokemon>> = self
                .client
                .fetch_detail_batch(&missing)
                .await?
                .into_iter()
                .map(Arc::new)
                .collect();
            self.cache.put_shared_details(fetched.iter().cloned());
            for record in fetched {
                found.insert(record.id, record);
            }
        }

        let pokemon: Vec<Arc<Pokemon>> = ids.iter().filter_map(|id| found.get(id).cloned()).collect();
        if pokemon.len() != ids.len() {
            warn!(
                requested = ids.len(),
                resolved = pokemon.len(),
                "Dropping entries without a matching detail record"
            );
        }
        Ok(pokemon)
    }
}
