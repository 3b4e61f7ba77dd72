//! REST API client module for PokéAPI.
//!
//! This module provides the `ApiClient` for the three read operations the
//! browser needs: a page of the catalog index, a single detail record, and a
//! concurrent batch of detail records.
//!
//! Failures are normalized into `ApiError`: `NotFound`, `Transport`, `Parse`.

pub mod client;
pub mod error;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use error::ApiError;
