//! Record building - per-entity multi-step fetch and enrichment.
//!
//! This module provides:
//! - RecordBuilder trait, the replaceable collaborator the harvester drives
//! - PokeApiBuilder, the pokemon → species → evolution chain implementation
//! - Primary-branch lineage walk
//! - Sprite URL resolution

mod lineage;
mod pokeapi;
mod sprites;

use async_trait::async_trait;

use crate::domain::{BuildOutcome, EntityLocator};

pub use lineage::primary_lineage;
pub use pokeapi::PokeApiBuilder;
pub use sprites::{DEFAULT_NORMAL_BASE_URL, DEFAULT_PROBE_TIMEOUT, DEFAULT_SHINY_BASE_URL, SpriteResolver, candidates};

/// Builds one complete record for one locator.
///
/// Implementations never fail past this boundary: every problem is reported
/// as `BuildOutcome::Failure` so one bad entity cannot abort the batch.
#[async_trait]
pub trait RecordBuilder: Send + Sync {
    async fn build(&self, locator: &EntityLocator) -> BuildOutcome;
}
