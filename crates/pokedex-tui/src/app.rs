//! Application state management for the pokedex browser.
//!
//! This module contains the core `App` struct that manages all application state,
//! including the canonical view state, route history, the search input buffer,
//! and coordination of background loads.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use pokedex_core::models::{Pokemon, PokemonId};
use pokedex_core::orchestrator::{DisplayPage, LoadError, LoadSequence, LoadTicket, Orchestrator};
use pokedex_core::view_state::{SearchDebouncer, ViewQuery, ViewStateSync};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background load channel.
/// A handful of loads can be in flight when paging quickly; stale ones are dropped.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for search input.
/// The longest Pokémon names are well under 30 characters.
const MAX_SEARCH_LENGTH: usize = 40;

// ============================================================================
// UI State Types
// ============================================================================

/// One entry in the navigation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    List,
    Detail(PokemonId),
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Progress of a load driving one screen.
#[derive(Debug, Clone)]
pub enum LoadStatus<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> LoadStatus<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadStatus::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

// ============================================================================
// Background Load Results
// ============================================================================

/// Completed loads sent back from spawned tasks.
///
/// Each carries the ticket it was started with; only results whose ticket is
/// still current are applied.
enum LoadResult {
    View(LoadTicket, Result<DisplayPage, LoadError>),
    Detail(LoadTicket, PokemonId, Result<Arc<Pokemon>, LoadError>),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    orchestrator: Orchestrator,

    // Canonical view state and search input
    pub view: ViewStateSync,
    pub search: SearchDebouncer,

    // UI State
    pub state: AppState,
    routes: Vec<Route>,
    pub selection: usize,

    // Loaded data
    pub list: LoadStatus<DisplayPage>,
    pub detail: LoadStatus<Arc<Pokemon>>,
    /// Query of the most recently started list load.
    requested: Option<ViewQuery>,

    // Stale-load guards
    view_sequence: LoadSequence,
    detail_sequence: LoadSequence,

    // Background task channel
    load_rx: mpsc::Receiver<LoadResult>,
    load_tx: mpsc::Sender<LoadResult>,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance starting from a canonical query string.
    pub fn new(orchestrator: Orchestrator, initial_query: &str) -> Self {
        let (load_tx, load_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let view = ViewStateSync::from_query_string(initial_query);
        let search = SearchDebouncer::new(&view.current().search);
        debug!(query = %view.query_string(), "App created");

        Self {
            orchestrator,
            view,
            search,
            state: AppState::Normal,
            routes: vec![Route::List],
            selection: 0,
            list: LoadStatus::Idle,
            detail: LoadStatus::Idle,
            requested: None,
            view_sequence: LoadSequence::new(),
            detail_sequence: LoadSequence::new(),
            load_rx,
            load_tx,
            status_message: None,
        }
    }

    pub fn route(&self) -> Route {
        self.routes.last().copied().unwrap_or(Route::List)
    }

    pub fn cache_age(&self) -> String {
        self.orchestrator.cache().age_display()
    }

    pub fn display_page(&self) -> Option<&DisplayPage> {
        self.list.ready()
    }

    pub fn selected_pokemon(&self) -> Option<&Arc<Pokemon>> {
        self.display_page().and_then(|page| page.pokemon.get(self.selection))
    }

    // ===== Loading =====

    /// Start a list load if the canonical query differs from the last one requested.
    pub fn sync_view(&mut self) {
        let query = self.view.current();
        if self.requested.as_ref() != Some(&query) {
            self.start_view_load(query, false);
        }
    }

    fn start_view_load(&mut self, query: ViewQuery, retry: bool) {
        let ticket = self.view_sequence.issue();
        debug!(?ticket, search = %query.search, page = query.page, retry, "Starting view load");

        self.list = LoadStatus::Loading;
        self.requested = Some(query.clone());

        let orchestrator = self.orchestrator.clone();
        let tx = self.load_tx.clone();
        tokio::spawn(async move {
            let result = if retry {
                orchestrator.retry(&query).await
            } else {
                orchestrator.load_view(&query).await
            };
            Self::send_result(&tx, LoadResult::View(ticket, result)).await;
        });
    }

    fn start_detail_load(&mut self, id: PokemonId) {
        let ticket = self.detail_sequence.issue();
        debug!(?ticket, %id, "Starting detail load");

        self.detail = LoadStatus::Loading;

        let orchestrator = self.orchestrator.clone();
        let tx = self.load_tx.clone();
        tokio::spawn(async move {
            let result = orchestrator.load_detail(id).await;
            Self::send_result(&tx, LoadResult::Detail(ticket, id, result)).await;
        });
    }

    async fn send_result(tx: &mpsc::Sender<LoadResult>, result: LoadResult) {
        if tx.send(result).await.is_err() {
            debug!("App closed before load finished");
        }
    }

    /// Check for completed background loads and apply the current ones
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.load_rx.try_recv() {
            self.process_load_result(result);
        }
    }

    fn process_load_result(&mut self, result: LoadResult) {
        match result {
            LoadResult::View(ticket, result) => {
                if !self.view_sequence.is_current(ticket) {
                    debug!(?ticket, "Dropping stale view load");
                    return;
                }
                match result {
                    Ok(page) => {
                        info!(
                            shown = page.pokemon.len(),
                            total_pages = page.total_pages,
                            "View loaded"
                        );
                        self.selection = self.selection.min(page.pokemon.len().saturating_sub(1));
                        self.list = LoadStatus::Ready(page);
                    }
                    Err(e) => {
                        warn!(error = %e, "View load failed");
                        self.list = LoadStatus::Failed(e.to_string());
                    }
                }
            }
            LoadResult::Detail(ticket, id, result) => {
                if !self.detail_sequence.is_current(ticket) || self.route() != Route::Detail(id) {
                    debug!(?ticket, %id, "Dropping stale detail load");
                    return;
                }
                self.detail = match result {
                    Ok(pokemon) => LoadStatus::Ready(pokemon),
                    Err(e) => {
                        warn!(error = %e, %id, "Detail load failed");
                        LoadStatus::Failed(e.to_string())
                    }
                };
            }
        }
    }

    // ===== Search =====

    pub fn start_search(&mut self) {
        self.state = AppState::Searching;
    }

    pub fn search_input(&mut self, c: char, now: Instant) {
        if self.search.buffer().chars().count() < MAX_SEARCH_LENGTH && !c.is_control() {
            self.search.push_char(c, now);
        }
    }

    pub fn search_backspace(&mut self, now: Instant) {
        self.search.pop_char(now);
    }

    /// Clear the search box, committing the empty term immediately.
    pub fn clear_search(&mut self) {
        self.search.clear();
        self.commit_search("");
    }

    fn commit_search(&mut self, term: &str) {
        self.view.set_search_term(term);
        self.selection = 0;
        self.sync_view();
    }

    /// Advance time-driven state: commits the search term once typing settles.
    pub fn tick(&mut self, now: Instant) {
        let committed = self.view.current().search;
        if let Some(term) = self.search.poll(&committed, now) {
            debug!(term = %term, "Committing debounced search");
            self.commit_search(&term);
        }
    }

    // ===== Navigation =====

    pub fn select_next(&mut self) {
        let len = self.display_page().map(|p| p.pokemon.len()).unwrap_or(0);
        if len > 0 && self.selection + 1 < len {
            self.selection += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selection = self.selection.saturating_sub(1);
    }

    pub fn next_page(&mut self) {
        let current = self.view.current().page;
        self.go_to_page(current.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        let current = self.view.current().page;
        self.go_to_page(current.saturating_sub(1));
    }

    pub fn first_page(&mut self) {
        self.go_to_page(1);
    }

    pub fn last_page(&mut self) {
        self.go_to_page(u32::MAX);
    }

    /// Move to `target`, clamped to the pages of the loaded result.
    /// Ignored while searching or before a page has loaded.
    fn go_to_page(&mut self, target: u32) {
        let Some(page) = self.display_page() else {
            return;
        };
        if !page.show_pagination() {
            return;
        }
        let target = target.clamp(1, page.total_pages);
        if target != self.view.current().page {
            self.view.set_page(target);
            self.selection = 0;
            self.sync_view();
        }
    }

    /// External navigation to a canonical query string.
    pub fn navigate(&mut self, qs: &str) {
        self.view.navigate(qs);
        self.search.sync_external(&self.view.current().search);
        self.routes.truncate(1);
        self.selection = 0;
        self.sync_view();
    }

    pub fn open_selected(&mut self) {
        if let Some(id) = self.selected_pokemon().map(|p| p.id) {
            self.open_detail(id);
        }
    }

    /// Push the detail page for `id` over the current route and load it.
    pub fn open_detail(&mut self, id: PokemonId) {
        self.routes.push(Route::Detail(id));
        self.start_detail_load(id);
    }

    pub fn go_back(&mut self) {
        if self.routes.len() > 1 {
            self.routes.pop();
            self.detail = LoadStatus::Idle;
        }
    }

    // ===== Recovery =====

    /// Re-run whatever failed on the current screen.
    pub fn retry(&mut self) {
        match self.route() {
            Route::List => {
                if self.list.error().is_some() {
                    info!("Retrying view load");
                    let query = self.view.current();
                    self.start_view_load(query, true);
                }
            }
            Route::Detail(id) => {
                if self.detail.error().is_some() {
                    info!(%id, "Retrying detail load");
                    self.start_detail_load(id);
                }
            }
        }
    }

    /// Drop all cached data and return to the default view.
    pub fn reset(&mut self) {
        info!("Resetting view and cache");
        self.orchestrator.cache().clear();
        self.requested = None;
        self.navigate("");
        self.status_message = Some("Cache cleared".to_string());
    }

    /// Await and apply the next completed load.
    #[cfg(test)]
    async fn wait_for_load(&mut self) {
        if let Some(result) = self.next_load().await {
            self.process_load_result(result);
        }
    }

    /// Await the next completed load without applying it.
    #[cfg(test)]
    async fn next_load(&mut self) -> Option<LoadResult> {
        self.load_rx.recv().await
    }
}

// ============================================================================
// Tests
// ============================================================================
