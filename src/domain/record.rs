//! Enriched output record and the completeness predicate used for resume.
//!
//! A stored record only counts as "done" when it carries `id`, `stats` and
//! `types`. Older or partially written records that miss any of these are
//! fetched again on the next run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields that must be present and non-null for a stored record to count as done
const COMPLETENESS_FIELDS: [&str; 3] = ["id", "stats", "types"];

/// One fully enriched Pokémon record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub name: String,
    pub height: u32,
    pub weight: u32,
    pub base_experience: Option<u32>,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub stats: BTreeMap<String, u32>,
    pub sprites: Sprites,
    pub forms: Vec<String>,
    pub evolution_chain: Vec<String>,
    pub generation: String,
    pub habitat: Option<String>,
    pub color: String,
    pub shape: Option<String>,
    pub is_legendary: bool,
    pub is_mythical: bool,
    pub flavor_text_entries: Vec<String>,
}

/// Animated sprite URLs; `None` when no candidate exists on the sprite host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    pub default: Option<String>,
    pub shiny: Option<String>,
}

/// Check whether a stored record satisfies the completeness predicate.
pub fn is_complete(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };
    COMPLETENESS_FIELDS
        .iter()
        .all(|field| object.get(*field).is_some_and(|v| !v.is_null()))
}

/// Dedup identifier of a stored record.
pub fn record_name(value: &Value) -> Option<&str> {
    value.get("name").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_complete_record() {
        let value = json!({"id": 1, "name": "bulbasaur", "stats": {"hp": 45}, "types": ["grass"]});
        assert!(is_complete(&value));
    }

    #[test]
    fn test_missing_stats_is_incomplete() {
        let value = json!({"id": 1, "name": "bulbasaur", "types": ["grass"]});
        assert!(!is_complete(&value));
    }

    #[test]
    fn test_missing_types_is_incomplete() {
        let value = json!({"id": 1, "name": "bulbasaur", "stats": {}});
        assert!(!is_complete(&value));
    }

    #[test]
    fn test_null_id_is_incomplete() {
        let value = json!({"id": null, "name": "bulbasaur", "stats": {}, "types": []});
        assert!(!is_complete(&value));
    }

    #[test]
    fn test_non_object_is_incomplete() {
        assert!(!is_complete(&json!("bulbasaur")));
        assert!(!is_complete(&json!([1, 2, 3])));
    }

    #[test]
    fn test_serialized_record_is_complete() {
        let record = Record {
            id: 25,
            name: "pikachu".to_string(),
            types: vec!["electric".to_string()],
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert!(is_complete(&value));
        assert_eq!(record_name(&value), Some("pikachu"));
    }

    #[test]
    fn test_sprites_serialize_as_nullable() {
        let value = serde_json::to_value(Sprites::default()).unwrap();
        assert_eq!(value, json!({"default": null, "shiny": null}));
    }
}
