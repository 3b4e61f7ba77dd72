//! View state: the canonical (search, page) pair and search input handling.

pub mod debounce;
pub mod query;

pub use debounce::{SearchDebouncer, SEARCH_DEBOUNCE};
pub use query::{ViewQuery, ViewStateSync, PAGE_SIZE};
