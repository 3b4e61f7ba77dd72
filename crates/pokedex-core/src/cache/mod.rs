//! In-memory session cache.
//!
//! This module provides the `SessionCache` holding the complete catalog
//! index and every detail record fetched so far. Nothing is written to disk;
//! the cache lives as long as the process.
//!
//! A single clock governs freshness: after 30 minutes without an index
//! reload, the index and all detail records are treated as absent together.

pub mod session;

pub use session::{CacheState, IndexSnapshot, SessionCache, FRESHNESS_WINDOW_MINUTES};
