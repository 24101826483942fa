//! Upstream transport - PokeAPI and sprite host access
//!
//! This module provides:
//! - Fetcher trait for API abstraction
//! - HttpFetcher implementation over reqwest
//! - MockFetcher for tests (canned documents, statuses and sprite sets)
//! - Typed shapes of the upstream documents

pub mod client;
pub mod documents;
pub mod http;
pub mod mock;

pub use client::Fetcher;
pub use documents::{
    AbilitySlot, ApiResource, ChainLink, EvolutionChainDoc, FlavorText, ListingPage, NamedResource, PokemonDoc,
    SpeciesDoc, StatEntry, TypeSlot,
};
pub use http::{HttpConfig, HttpFetcher};
pub use mock::{MockFetcher, MockResponse};
