use serde::{Deserialize, Serialize};

/// `{name, url}` reference used throughout the upstream API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedResource {
    #[serde(default)]
    pub name: String,
    pub url: String,
}

/// One page of the collection listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageListing {
    /// Total number of records upstream
    #[serde(default)]
    pub count: u32,
    /// URL of the next page, if any
    pub next: Option<String>,
    /// URL of the previous page, if any
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

impl PageListing {
    /// Detail URLs in page order
    pub fn urls(&self) -> Vec<String> {
        self.results.iter().map(|r| r.url.clone()).collect()
    }
}

/// Primary record resource (`/pokemon/{id}`)
#[derive(Debug, Clone, Deserialize)]
pub struct RawCreature {
    pub id: u32,
    pub name: String,
    pub species: NamedResource,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub stats: Vec<StatEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlot {
    #[serde(default)]
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatEntry {
    pub base_stat: u32,
    pub stat: NamedResource,
}

/// Secondary localization resource (`/pokemon-species/{id}`)
#[derive(Debug, Clone, Deserialize)]
pub struct RawSpecies {
    #[serde(default)]
    pub names: Vec<LocalizedName>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalizedName {
    pub name: String,
    pub language: NamedResource,
}

impl RawSpecies {
    /// Name whose language tag equals `locale`
    pub fn name_for(&self, locale: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|entry| entry.language.name.eq_ignore_ascii_case(locale))
            .map(|entry| entry.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_listing() {
        let listing: PageListing = serde_json::from_value(json!({
            "count": 1302,
            "next": "https://pokeapi.co/api/v2/pokemon/?offset=20&limit=20",
            "previous": null,
            "results": [
                {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/"},
                {"name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/"}
            ]
        }))
        .unwrap();

        assert_eq!(listing.count, 1302);
        assert!(listing.previous.is_none());
        assert_eq!(
            listing.urls(),
            vec![
                "https://pokeapi.co/api/v2/pokemon/1/".to_string(),
                "https://pokeapi.co/api/v2/pokemon/2/".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_creature_without_sprite() {
        let creature: RawCreature = serde_json::from_value(json!({
            "id": 10001,
            "name": "deoxys-attack",
            "species": {"name": "deoxys", "url": "https://pokeapi.co/api/v2/pokemon-species/386/"},
            "types": [{"slot": 1, "type": {"name": "psychic", "url": "u"}}],
            "sprites": {"front_default": null},
            "stats": [{"base_stat": 50, "effort": 0, "stat": {"name": "hp", "url": "u"}}]
        }))
        .unwrap();

        assert_eq!(creature.types[0].kind.name, "psychic");
        assert!(creature.sprites.front_default.is_none());
        assert_eq!(creature.stats[0].base_stat, 50);
    }

    #[test]
    fn test_species_name_lookup() {
        let species: RawSpecies = serde_json::from_value(json!({
            "names": [
                {"name": "Bulbasaur", "language": {"name": "en", "url": "u"}},
                {"name": "Bisasam", "language": {"name": "de", "url": "u"}}
            ]
        }))
        .unwrap();

        assert_eq!(species.name_for("de"), Some("Bisasam"));
        assert_eq!(species.name_for("en"), Some("Bulbasaur"));
        assert_eq!(species.name_for("fr"), None);
    }
}
