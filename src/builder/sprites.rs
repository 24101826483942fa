//! Animated sprite resolution against the Showdown sprite host.
//!
//! For each variant (normal, shiny) the form-specific file is probed first,
//! then the base-name file. A failed probe counts as "not found".

use std::time::Duration;

use log::debug;

use crate::domain::Sprites;
use crate::upstream::Fetcher;

pub const DEFAULT_NORMAL_BASE_URL: &str = "https://play.pokemonshowdown.com/sprites/ani/";
pub const DEFAULT_SHINY_BASE_URL: &str = "https://play.pokemonshowdown.com/sprites/ani-shiny/";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Probes sprite candidates and picks the first that exists
#[derive(Debug, Clone)]
pub struct SpriteResolver {
    normal_base_url: String,
    shiny_base_url: String,
    probe_timeout: Duration,
}

impl Default for SpriteResolver {
    fn default() -> Self {
        Self {
            normal_base_url: DEFAULT_NORMAL_BASE_URL.to_string(),
            shiny_base_url: DEFAULT_SHINY_BASE_URL.to_string(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

impl SpriteResolver {
    pub fn new(normal_base_url: impl Into<String>, shiny_base_url: impl Into<String>, probe_timeout: Duration) -> Self {
        Self {
            normal_base_url: normal_base_url.into(),
            shiny_base_url: shiny_base_url.into(),
            probe_timeout,
        }
    }

    /// Resolve both sprite variants for `name` and its first declared form
    pub async fn resolve<F: Fetcher + ?Sized>(&self, fetcher: &F, name: &str, first_form: Option<&str>) -> Sprites {
        let shiny = self
            .first_existing(fetcher, candidates(&self.shiny_base_url, name, first_form))
            .await;
        let default = self
            .first_existing(fetcher, candidates(&self.normal_base_url, name, first_form))
            .await;
        Sprites { default, shiny }
    }

    async fn first_existing<F: Fetcher + ?Sized>(&self, fetcher: &F, candidates: Vec<String>) -> Option<String> {
        for url in candidates {
            if fetcher.exists(&url, self.probe_timeout).await {
                return Some(url);
            }
        }
        debug!("No sprite found among candidates under probe timeout {:?}", self.probe_timeout);
        None
    }
}

/// Candidate URLs in precedence order: form-specific, then base name.
pub fn candidates(base_url: &str, name: &str, first_form: Option<&str>) -> Vec<String> {
    let name = name.to_lowercase();
    let mut urls = Vec::with_capacity(2);
    if let Some(form) = first_form {
        let form = form.to_lowercase().replace('-', "");
        urls.push(format!("{}{}.gif", base_url, form));
    }
    let base = format!("{}{}.gif", base_url, name);
    if !urls.contains(&base) {
        urls.push(base);
    }
    urls
}
