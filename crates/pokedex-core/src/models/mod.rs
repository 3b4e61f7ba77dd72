//! Data models for PokéAPI entities.
//!
//! This module contains the data structures used to represent catalog data:
//!
//! - `PokemonId`: the canonical identifier, parsed out of locator URLs
//! - `CatalogEntry`, `ListPage`: lightweight index entries from the list endpoint
//! - `Pokemon`: the full detail record, with presentation helpers

pub mod catalog;
pub mod pokemon;

pub use catalog::{CatalogEntry, ListPage, PokemonId};
pub use pokemon::{Pokemon, PokemonResponse, Sprites, Stat, StatBand};
