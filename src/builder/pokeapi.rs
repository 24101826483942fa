//! PokeAPI record builder.
//!
//! Three dependent fetches per locator: the pokemon document, its species,
//! and (when referenced) the evolution chain. Sprite URLs are probed last.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use super::RecordBuilder;
use super::lineage::primary_lineage;
use super::sprites::SpriteResolver;
use crate::domain::{BuildOutcome, EntityLocator, Record};
use crate::error::Result;
use crate::upstream::client::fetch_as;
use crate::upstream::{EvolutionChainDoc, Fetcher, PokemonDoc, SpeciesDoc};

/// Language kept from the species flavor texts
const FLAVOR_LANGUAGE: &str = "en";

/// Builds records from PokeAPI documents
pub struct PokeApiBuilder<F: Fetcher> {
    fetcher: Arc<F>,
    sprites: SpriteResolver,
}

impl<F: Fetcher> PokeApiBuilder<F> {
    pub fn new(fetcher: Arc<F>, sprites: SpriteResolver) -> Self {
        Self { fetcher, sprites }
    }

    async fn try_build(&self, locator: &EntityLocator) -> Result<Record> {
        let pokemon: PokemonDoc = fetch_as(self.fetcher.as_ref(), &locator.url).await?;
        let species: SpeciesDoc = fetch_as(self.fetcher.as_ref(), &pokemon.species.url).await?;

        let evolution_chain = match &species.evolution_chain {
            Some(resource) => self.fetch_lineage(&resource.url).await?,
            None => Vec::new(),
        };

        let first_form = pokemon.forms.first().map(|f| f.name.as_str());
        let sprites = self
            .sprites
            .resolve(self.fetcher.as_ref(), &pokemon.name, first_form)
            .await;

        Ok(assemble(pokemon, species, evolution_chain, sprites))
    }

    /// A non-success status leaves the lineage empty; other failures propagate.
    async fn fetch_lineage(&self, url: &str) -> Result<Vec<String>> {
        match fetch_as::<EvolutionChainDoc, _>(self.fetcher.as_ref(), url).await {
            Ok(doc) => Ok(primary_lineage(&doc.chain)),
            Err(e) if e.status().is_some() => {
                warn!("Evolution chain unavailable ({}), continuing without lineage", e);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl<F: Fetcher> RecordBuilder for PokeApiBuilder<F> {
    async fn build(&self, locator: &EntityLocator) -> BuildOutcome {
        debug!("Building record for {}", locator.name);
        match self.try_build(locator).await {
            Ok(record) => BuildOutcome::Success(record),
            Err(e) => BuildOutcome::failure(&locator.name, e),
        }
    }
}

fn assemble(
    pokemon: PokemonDoc,
    species: SpeciesDoc,
    evolution_chain: Vec<String>,
    sprites: crate::domain::Sprites,
) -> Record {
    Record {
        id: pokemon.id,
        name: pokemon.name,
        height: pokemon.height,
        weight: pokemon.weight,
        base_experience: pokemon.base_experience,
        types: pokemon.types.into_iter().map(|t| t.kind.name).collect(),
        abilities: pokemon.abilities.into_iter().map(|a| a.ability.name).collect(),
        stats: pokemon
            .stats
            .into_iter()
            .map(|s| (s.stat.name, s.base_stat))
            .collect(),
        sprites,
        forms: pokemon.forms.into_iter().map(|f| f.name).collect(),
        evolution_chain,
        generation: species.generation.name,
        habitat: species.habitat.map(|h| h.name),
        color: species.color.name,
        shape: species.shape.map(|s| s.name),
        is_legendary: species.is_legendary,
        is_mythical: species.is_mythical,
        flavor_text_entries: species
            .flavor_text_entries
            .into_iter()
            .filter(|entry| entry.language.name == FLAVOR_LANGUAGE)
            .map(|entry| entry.flavor_text)
            .collect(),
    }
}
