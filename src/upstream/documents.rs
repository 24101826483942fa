//! PokeAPI document shapes
//!
//! Only the fields the builder consumes are modelled; everything else in the
//! upstream payloads is ignored.

use serde::Deserialize;

use crate::domain::EntityLocator;

/// `{name, url}` reference used all over PokeAPI
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// Unnamed `{url}` reference (evolution chains)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiResource {
    pub url: String,
}

/// One page of the `/pokemon` listing
#[derive(Debug, Clone, Deserialize)]
pub struct ListingPage {
    #[serde(default)]
    pub next: Option<String>,
    pub results: Vec<EntityLocator>,
}

/// `/pokemon/{id}` document
#[derive(Debug, Clone, Deserialize)]
pub struct PokemonDoc {
    pub id: u64,
    pub name: String,
    pub height: u32,
    pub weight: u32,
    pub base_experience: Option<u32>,
    pub types: Vec<TypeSlot>,
    pub abilities: Vec<AbilitySlot>,
    pub stats: Vec<StatEntry>,
    pub forms: Vec<NamedResource>,
    pub species: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatEntry {
    pub base_stat: u32,
    pub stat: NamedResource,
}

/// `/pokemon-species/{id}` document
#[derive(Debug, Clone, Deserialize)]
pub struct SpeciesDoc {
    pub generation: NamedResource,
    pub habitat: Option<NamedResource>,
    pub color: NamedResource,
    pub shape: Option<NamedResource>,
    pub is_legendary: bool,
    pub is_mythical: bool,
    pub flavor_text_entries: Vec<FlavorText>,
    #[serde(default)]
    pub evolution_chain: Option<ApiResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlavorText {
    pub flavor_text: String,
    pub language: NamedResource,
}

/// `/evolution-chain/{id}` document
#[derive(Debug, Clone, Deserialize)]
pub struct EvolutionChainDoc {
    pub chain: ChainLink,
}

/// One node of the evolution tree
#[derive(Debug, Clone, Deserialize)]
pub struct ChainLink {
    pub species: NamedResource,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_listing_page_without_next() {
        let page: ListingPage = serde_json::from_value(json!({
            "count": 2,
            "next": null,
            "previous": null,
            "results": [
                {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/"},
                {"name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/"}
            ]
        }))
        .unwrap();
        assert!(page.next.is_none());
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[1].name, "ivysaur");
    }

    #[test]
    fn test_type_slot_renames_type_field() {
        let slot: TypeSlot = serde_json::from_value(json!({
            "slot": 1,
            "type": {"name": "grass", "url": "https://pokeapi.co/api/v2/type/12/"}
        }))
        .unwrap();
        assert_eq!(slot.kind.name, "grass");
    }

    #[test]
    fn test_species_with_null_habitat_and_no_chain() {
        let species: SpeciesDoc = serde_json::from_value(json!({
            "generation": {"name": "generation-ix", "url": "g/9/"},
            "habitat": null,
            "color": {"name": "white", "url": "c/9/"},
            "shape": null,
            "is_legendary": false,
            "is_mythical": true,
            "flavor_text_entries": [],
            "evolution_chain": null
        }))
        .unwrap();
        assert!(species.habitat.is_none());
        assert!(species.shape.is_none());
        assert!(species.evolution_chain.is_none());
        assert!(species.is_mythical);
    }

    #[test]
    fn test_chain_link_leaf_defaults_empty() {
        let link: ChainLink = serde_json::from_value(json!({
            "species": {"name": "mew", "url": "s/151/"}
        }))
        .unwrap();
        assert!(link.evolves_to.is_empty());
    }
}
