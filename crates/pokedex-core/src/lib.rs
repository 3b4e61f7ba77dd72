//! Core library for pokedex.
//!
//! Everything the terminal front end needs that is not about drawing:
//!
//! - `api`: PokéAPI client and error taxonomy
//! - `cache`: session-lifetime cache of the catalog index and detail records
//! - `view_state`: canonical (search, page) state and debounced search input
//! - `orchestrator`: turns a view query into a display page
//! - `config`: optional user configuration

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod orchestrator;
pub mod utils;
pub mod view_state;

pub use api::{ApiClient, ApiError};
pub use cache::SessionCache;
pub use config::Config;
pub use orchestrator::{DisplayPage, LoadError, LoadSequence, LoadTicket, Orchestrator};
pub use view_state::{SearchDebouncer, ViewQuery, ViewStateSync};
