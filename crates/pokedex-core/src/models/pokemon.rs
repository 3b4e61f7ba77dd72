//! Detail records for individual Pokémon.

use serde::{Deserialize, Serialize};

use super::PokemonId;
use crate::utils::format::title_case;

/// Highest base stat value in the games, used to scale stat bars.
pub const MAX_BASE_STAT: u32 = 255;

// Response from /pokemon/{id} endpoint (trimmed to the fields we display)
#[derive(Debug, Clone, Deserialize)]
pub struct PokemonResponse {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    pub sprites: SpritesResponse,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub stats: Vec<StatSlot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpritesResponse {
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork")]
    pub official_artwork: Option<ArtworkSprites>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtworkSprites {
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub type_ref: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatSlot {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedResource {
    pub name: String,
}

impl PokemonResponse {
    /// Convert the wire shape into the domain record.
    pub fn to_pokemon(&self) -> Pokemon {
        let official_artwork = self
            .sprites
            .other
            .as_ref()
            .and_then(|o| o.official_artwork.as_ref())
            .and_then(|a| a.front_default.clone());

        Pokemon {
            id: PokemonId(self.id),
            name: self.name.clone(),
            height: self.height,
            weight: self.weight,
            sprites: Sprites {
                front_default: self.sprites.front_default.clone(),
                official_artwork,
            },
            types: self.types.iter().map(|t| t.type_ref.name.clone()).collect(),
            stats: self
                .stats
                .iter()
                .map(|s| Stat {
                    name: s.stat.name.clone(),
                    base_stat: s.base_stat,
                })
                .collect(),
        }
    }
}

/// A fully fetched Pokémon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: PokemonId,
    pub name: String,
    /// Height in decimeters.
    pub height: u32,
    /// Weight in hectograms.
    pub weight: u32,
    pub sprites: Sprites,
    pub types: Vec<String>,
    pub stats: Vec<Stat>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
    pub official_artwork: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub name: String,
    pub base_stat: u32,
}

impl Pokemon {
    /// Name with hyphen-separated words capitalized, e.g. "Mr Mime".
    pub fn display_name(&self) -> String {
        title_case(&self.name)
    }

    pub fn height_display(&self) -> String {
        format!("{:.1} m", self.height as f64 / 10.0)
    }

    pub fn weight_display(&self) -> String {
        format!("{:.1} kg", self.weight as f64 / 10.0)
    }

    /// Best available artwork: official artwork first, then the primary sprite.
    pub fn image_url(&self) -> Option<&str> {
        self.sprites
            .official_artwork
            .as_deref()
            .or(self.sprites.front_default.as_deref())
    }
}

/// Coarse rating of a base stat, used for coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatBand {
    Low,
    Average,
    High,
    Exceptional,
}

impl Stat {
    /// Stat name with hyphen-separated words capitalized, e.g. "Special Attack".
    pub fn display_name(&self) -> String {
        title_case(&self.name)
    }

    pub fn band(&self) -> StatBand {
        match self.base_stat {
            150.. => StatBand::Exceptional,
            100..=149 => StatBand::High,
            50..=99 => StatBand::Average,
            _ => StatBand::Low,
        }
    }

    /// Share of the maximum base stat, clamped to 100.
    pub fn percentage(&self) -> f64 {
        (self.base_stat as f64 / MAX_BASE_STAT as f64 * 100.0).min(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIKACHU_JSON: &str = r#"{
        "id": 25,
        "name": "pikachu",
        "height": 4,
        "weight": 60,
        "base_experience": 112,
        "sprites": {
            "front_default": "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/25.png",
            "back_default": null,
            "other": {
                "official-artwork": {
                    "front_default": "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/25.png",
                    "front_shiny": null
                }
            }
        },
        "types": [{"slot": 1, "type": {"name": "electric", "url": "https://pokeapi.co/api/v2/type/13/"}}],
        "stats": [
            {"base_stat": 35, "effort": 0, "stat": {"name": "hp", "url": "https://pokeapi.co/api/v2/stat/1/"}},
            {"base_stat": 50, "effort": 0, "stat": {"name": "special-attack", "url": "https://pokeapi.co/api/v2/stat/4/"}},
            {"base_stat": 90, "effort": 2, "stat": {"name": "speed", "url": "https://pokeapi.co/api/v2/stat/6/"}}
        ]
    }"#;

    fn pikachu() -> Pokemon {
        let resp: PokemonResponse =
            serde_json::from_str(PIKACHU_JSON).expect("Failed to parse pokemon test JSON");
        resp.to_pokemon()
    }

    #[test]
    fn test_parse_pokemon_response() {
        let p = pikachu();
        assert_eq!(p.id, PokemonId(25));
        assert_eq!(p.name, "pikachu");
        assert_eq!(p.types, vec!["electric".to_string()]);
        assert_eq!(p.stats.len(), 3);
        assert_eq!(p.stats[1].name, "special-attack");
        assert_eq!(p.stats[1].base_stat, 50);
        assert!(p.sprites.official_artwork.as_deref().unwrap().ends_with("official-artwork/25.png"));
    }

    #[test]
    fn test_parse_pokemon_without_artwork() {
        let json = r#"{"id": 10001, "name": "deoxys-attack", "height": 17, "weight": 608,
            "sprites": {"front_default": null, "other": {"official-artwork": {"front_default": null}}},
            "types": [], "stats": []}"#;
        let p: Pokemon = serde_json::from_str::<PokemonResponse>(json).unwrap().to_pokemon();
        assert_eq!(p.image_url(), None);
        assert_eq!(p.display_name(), "Deoxys Attack");
    }

    #[test]
    fn test_image_url_fallback() {
        let mut p = pikachu();
        assert!(p.image_url().unwrap().contains("official-artwork"));

        p.sprites.official_artwork = None;
        assert!(p.image_url().unwrap().ends_with("pokemon/25.png"));
    }

    #[test]
    fn test_measurements() {
        let p = pikachu();
        assert_eq!(p.height_display(), "0.4 m");
        assert_eq!(p.weight_display(), "6.0 kg");
    }

    #[test]
    fn test_stat_display() {
        let p = pikachu();
        assert_eq!(p.stats[0].display_name(), "Hp");
        assert_eq!(p.stats[1].display_name(), "Special Attack");
    }

    #[test]
    fn test_stat_band() {
        let stat = |v| Stat { name: "hp".into(), base_stat: v };
        assert_eq!(stat(10).band(), StatBand::Low);
        assert_eq!(stat(50).band(), StatBand::Average);
        assert_eq!(stat(100).band(), StatBand::High);
        assert_eq!(stat(150).band(), StatBand::Exceptional);
        assert_eq!(stat(255).band(), StatBand::Exceptional);
    }

    #[test]
    fn test_stat_percentage_clamped() {
        let stat = |v| Stat { name: "hp".into(), base_stat: v };
        assert!((stat(51).percentage() - 20.0).abs() < 1e-9);
        assert_eq!(stat(255).percentage(), 100.0);
        assert_eq!(stat(300).percentage(), 100.0);
    }
}
