//! Entity locator - identifies one unit of work.

use serde::{Deserialize, Serialize};

/// Name plus fetch address for one entity, as returned by the listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityLocator {
    pub name: String,
    pub url: String,
}

impl EntityLocator {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_listing_entry() {
        let json = r#"{"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/"}"#;
        let locator: EntityLocator = serde_json::from_str(json).unwrap();
        assert_eq!(locator, EntityLocator::new("bulbasaur", "https://pokeapi.co/api/v2/pokemon/1/"));
    }
}
