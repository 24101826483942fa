//! In-memory fetcher for tests
//!
//! Serves canned JSON documents, statuses and transport errors keyed by URL,
//! and answers sprite probes from a fixed set of existing URLs. It also
//! records every request and tracks peak concurrency.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{HarvestError, Result};
use crate::upstream::client::Fetcher;

/// Canned answer for one URL
#[derive(Debug, Clone)]
pub enum MockResponse {
    Json(Value),
    Status(u16),
    TransportError(String),
}

/// Mock fetcher for testing
#[derive(Default)]
pub struct MockFetcher {
    responses: HashMap<String, MockResponse>,
    existing_sprites: HashSet<String>,
    delay: Option<Duration>,
    requests: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `value` for GET `url`
    pub fn with_json(mut self, url: &str, value: Value) -> Self {
        self.responses.insert(url.to_string(), MockResponse::Json(value));
        self
    }

    /// Answer GET `url` with a non-success status
    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_string(), MockResponse::Status(status));
        self
    }

    /// Fail GET `url` at the transport level
    pub fn with_transport_error(mut self, url: &str, message: &str) -> Self {
        self.responses
            .insert(url.to_string(), MockResponse::TransportError(message.to_string()));
        self
    }

    /// Mark a sprite URL as existing
    pub fn with_sprite(mut self, url: &str) -> Self {
        self.existing_sprites.insert(url.to_string());
        self
    }

    /// Delay every GET, so concurrent callers overlap
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All GET and HEAD URLs requested so far, in call order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// How many times `url` was requested
    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|u| u.as_str() == url).count()
    }

    /// Highest number of GETs observed in flight at once
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, url: &str) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn get_json(&self, url: &str) -> Result<Value> {
        self.record(url);

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.responses.get(url) {
            Some(MockResponse::Json(value)) => Ok(value.clone()),
            Some(MockResponse::Status(status)) => Err(HarvestError::Status {
                url: url.to_string(),
                status: *status,
            }),
            Some(MockResponse::TransportError(message)) => Err(HarvestError::Http(message.clone())),
            None => Err(HarvestError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }

    async fn exists(&self, url: &str, _timeout: Duration) -> bool {
        self.record(url);
        self.existing_sprites.contains(url)
    }
}
