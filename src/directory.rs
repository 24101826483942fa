//! Entity directory - the full catalog listing.
//!
//! One bulk listing call with a limit large enough for the whole catalog.
//! If the upstream still hands back a `next` page it is followed, unless a
//! cap on the number of entities has been reached.

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::domain::EntityLocator;
use crate::error::{HarvestError, Result};
use crate::upstream::client::fetch_as;
use crate::upstream::{Fetcher, ListingPage};

/// PokeAPI v2 root
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Large enough to list every entity in one call
pub const DEFAULT_LIST_LIMIT: u32 = 100_000;

/// Lists every entity locator exposed by the upstream source
pub struct EntityDirectory<F: Fetcher> {
    fetcher: Arc<F>,
    base_url: String,
    limit: u32,
    max_entities: Option<usize>,
}

impl<F: Fetcher> EntityDirectory<F> {
    pub fn new(fetcher: Arc<F>, base_url: impl Into<String>, limit: u32) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            limit,
            max_entities: None,
        }
    }

    /// Stop listing once this many locators are collected
    pub fn with_max_entities(mut self, max_entities: Option<usize>) -> Self {
        self.max_entities = max_entities;
        self
    }

    /// URL of the first listing page
    pub fn listing_url(&self) -> String {
        format!("{}/pokemon?limit={}&offset=0", self.base_url.trim_end_matches('/'), self.limit)
    }

    /// Fetch all locators; any failure is `UpstreamUnavailable`.
    pub async fn list_all(&self) -> Result<Vec<EntityLocator>> {
        let mut locators = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(self.listing_url());

        while let Some(url) = next {
            debug!("Listing page {}", url);
            let page: ListingPage = fetch_as(self.fetcher.as_ref(), &url)
                .await
                .map_err(|e| HarvestError::UpstreamUnavailable(e.to_string()))?;
            locators.extend(page.results);
            visited.insert(url);

            if let Some(max) = self.max_entities.filter(|max| locators.len() >= *max) {
                locators.truncate(max);
                break;
            }
            next = page.next.filter(|n| {
                let fresh = !visited.contains(n);
                if !fresh {
                    warn!("Listing page {} was already visited, stopping", n);
                }
                fresh
            });
        }

        info!("Upstream lists {} entities", locators.len());
        Ok(locators)
    }
}
