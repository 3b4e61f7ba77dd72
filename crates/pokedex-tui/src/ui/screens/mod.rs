//! Screen-specific content rendering, one module per route.

pub mod detail;
pub mod list;
