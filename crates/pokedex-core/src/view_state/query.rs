use serde::{Deserialize, Serialize};
use tracing::debug;
use url::form_urlencoded;

/// Entries shown per page when no search is active.
pub const PAGE_SIZE: usize = 20;

const SEARCH_KEY: &str = "search";
const PAGE_KEY: &str = "page";

/// The (search, page) pair that determines what the list screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewQuery {
    pub search: String,
    pub page: u32,
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
        }
    }
}

impl ViewQuery {
    pub fn new(search: impl Into<String>, page: u32) -> Self {
        Self {
            search: search.into(),
            page: page.max(1),
        }
    }

    /// Search term as used for matching.
    pub fn term(&self) -> &str {
        self.search.trim()
    }

    pub fn is_search_active(&self) -> bool {
        !self.term().is_empty()
    }
}

/// Keeps the canonical, shareable form of the view state.
///
/// The canonical form is an ordered list of query parameters, the same
/// shape as a URL query string. Keys other than `search` and `page` are
/// preserved untouched. Every update replaces the current state rather than
/// recording a new history entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewStateSync {
    params: Vec<(String, String)>,
}

impl ViewStateSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a query string, with or without the leading `?`.
    pub fn from_query_string(qs: &str) -> Self {
        let qs = qs.trim().trim_start_matches('?');
        let params = form_urlencoded::parse(qs.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { params }
    }

    /// The canonical query string, without the leading `?`.
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }

    /// Current view query. Page falls back to 1 when absent, not a positive
    /// integer, or zero.
    pub fn current(&self) -> ViewQuery {
        let search = self.get(SEARCH_KEY).unwrap_or_default().to_string();
        let page = self
            .get(PAGE_KEY)
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|&p| p > 0)
            .unwrap_or(1);
        ViewQuery { search, page }
    }

    /// New search term. Always resets to page 1.
    pub fn set_search_term(&mut self, term: &str) {
        if term.trim().is_empty() {
            self.remove(SEARCH_KEY);
        } else {
            self.set(SEARCH_KEY, term);
        }
        self.set(PAGE_KEY, "1");
        debug!(query = %self.query_string(), "Search term updated");
    }

    pub fn set_page(&mut self, page: u32) {
        self.set(PAGE_KEY, &page.to_string());
        debug!(query = %self.query_string(), "Page updated");
    }

    /// External navigation: replace the whole canonical form.
    pub fn navigate(&mut self, qs: &str) {
        *self = Self::from_query_string(qs);
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Overwrite the first occurrence and drop the rest, or append.
    fn set(&mut self, key: &str, value: &str) {
        match self.params.iter().position(|(k, _)| k == key) {
            Some(first) => {
                self.params[first].1 = value.to_string();
                let mut index = 0;
                self.params.retain(|(k, _)| {
                    let keep = index <= first || k != key;
                    index += 1;
                    keep
                });
            }
            None => self.params.push((key.to_string(), value.to_string())),
        }
    }

    fn remove(&mut self, key: &str) {
        self.params.retain(|(k, _)| k != key);
    }
}
