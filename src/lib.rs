//! dexpull - a resumable concurrent harvester for PokeAPI records
//!
//! dexpull lists every Pokémon the API exposes, enriches each one with its
//! species, evolution chain and animated sprites, and persists the results as
//! a single JSON array. Runs are resumable: entities already present and
//! complete in the output are skipped.

pub mod builder;
pub mod directory;
pub mod domain;
pub mod error;
pub mod harvester;
pub mod progress;
pub mod storage;
pub mod upstream;

pub use error::{HarvestError, Result};
pub use harvester::{HarvestState, HarvestSummary, Harvester, HarvesterConfig};
