//! Utility functions for string formatting and matching.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{capitalize, contains_ignore_case, title_case, truncate_string};
