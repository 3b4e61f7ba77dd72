//! Catalog index types.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Matches the trailing `/pokemon/<digits>/` segment of a locator URL.
static LOCATOR_ID: OnceLock<Regex> = OnceLock::new();

fn locator_regex() -> &'static Regex {
    LOCATOR_ID.get_or_init(|| Regex::new(r"/pokemon/(\d+)/").expect("locator pattern is valid"))
}

/// Canonical identifier for a Pokémon.
///
/// The API hands out identifiers embedded in URLs and accepts them as path
/// segments; everything inside the crate works with this integer form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PokemonId(pub u32);

impl PokemonId {
    /// Extract the identifier from a locator URL such as
    /// `https://pokeapi.co/api/v2/pokemon/25/`.
    ///
    /// URLs without a trailing numeric segment yield id `0`.
    pub fn from_locator(url: &str) -> Self {
        locator_regex()
            .captures(url)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .map(PokemonId)
            .unwrap_or_default()
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Zero-padded display form, e.g. `025`.
    pub fn padded(self) -> String {
        if self.0 == 0 {
            return String::new();
        }
        format!("{:03}", self.0)
    }
}

impl fmt::Display for PokemonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PokemonId {
    fn from(id: u32) -> Self {
        PokemonId(id)
    }
}

/// A lightweight entry from the catalog index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub url: String,
}

impl CatalogEntry {
    pub fn id(&self) -> PokemonId {
        PokemonId::from_locator(&self.url)
    }
}

/// Response from `GET /pokemon?limit=&offset=`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListPage {
    pub count: u64,
    #[serde(default)]
    pub results: Vec<CatalogEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_locator() {
        assert_eq!(
            PokemonId::from_locator("https://pokeapi.co/api/v2/pokemon/25/"),
            PokemonId(25)
        );
        assert_eq!(PokemonId::from_locator(".../pokemon/1025/"), PokemonId(1025));
    }

    #[test]
    fn test_from_locator_malformed() {
        assert_eq!(PokemonId::from_locator("https://pokeapi.co/api/v2/pokemon/pikachu/"), PokemonId(0));
        assert_eq!(PokemonId::from_locator("https://pokeapi.co/api/v2/pokemon/25"), PokemonId(0));
        assert_eq!(PokemonId::from_locator(""), PokemonId(0));
    }

    #[test]
    fn test_padded() {
        assert_eq!(PokemonId(1).padded(), "001");
        assert_eq!(PokemonId(25).padded(), "025");
        assert_eq!(PokemonId(1025).padded(), "1025");
        assert_eq!(PokemonId(0).padded(), "");
    }

    #[test]
    fn test_parse_list_page() {
        let json = r#"{"count":1302,"next":"https://pokeapi.co/api/v2/pokemon?offset=1&limit=1","previous":null,"results":[{"name":"bulbasaur","url":"https://pokeapi.co/api/v2/pokemon/1/"}]}"#;

        let page: ListPage = serde_json::from_str(json).expect("Failed to parse list page JSON");
        assert_eq!(page.count, 1302);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].name, "bulbasaur");
        assert_eq!(page.results[0].id(), PokemonId(1));
    }
}
