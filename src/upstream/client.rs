//! Core fetcher trait definition

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{HarvestError, Result};

/// Read-only access to the upstream source - each call is independent
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET a JSON document; non-success statuses are `HarvestError::Status`
    async fn get_json(&self, url: &str) -> Result<Value>;

    /// Lightweight existence probe (HEAD). Transport errors mean "not found".
    async fn exists(&self, url: &str, timeout: Duration) -> bool;
}

/// Fetch a document and deserialize it into `T`.
pub async fn fetch_as<T, F>(fetcher: &F, url: &str) -> Result<T>
where
    T: DeserializeOwned,
    F: Fetcher + ?Sized,
{
    let value = fetcher.get_json(url).await?;
    serde_json::from_value(value).map_err(|e| HarvestError::Parse(format!("{}: {}", url, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::{MockFetcher, NamedResource};
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_as_typed() {
        let fetcher = MockFetcher::new().with_json("u", json!({"name": "grass", "url": "t/12/"}));
        let resource: NamedResource = fetch_as(&fetcher, "u").await.unwrap();
        assert_eq!(resource.name, "grass");
    }

    #[tokio::test]
    async fn test_fetch_as_shape_mismatch_is_parse_error() {
        let fetcher = MockFetcher::new().with_json("u", json!({"unexpected": true}));
        let result: Result<NamedResource> = fetch_as(&fetcher, "u").await;
        assert!(matches!(result, Err(HarvestError::Parse(_))));
    }
}
