//! HTTP fetcher implementation
//!
//! This module implements the Fetcher trait over a shared reqwest client.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::error::{HarvestError, Result};
use crate::upstream::client::Fetcher;

/// Default timeout for primary document fetches
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every request
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Configuration for the HTTP fetcher
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Applies to every request unless a request sets its own
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// reqwest-backed fetcher
pub struct HttpFetcher {
    client: Client,
    config: HttpConfig,
}

impl HttpFetcher {
    /// Create a new fetcher
    pub fn new(config: HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| HarvestError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HarvestError::Http(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| HarvestError::Parse(format!("Failed to parse {}: {}", url, e)))
    }

    async fn exists(&self, url: &str, timeout: Duration) -> bool {
        match self.client.head(url).timeout(timeout).send().await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                debug!("Probe of {} failed: {}", url, e);
                false
            }
        }
    }
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer a single request on a local port with a canned response
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}/pokemon/1/", addr)
    }

    #[test]
    fn test_config_default() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_debug_shows_configured_timeout() {
        let fetcher = HttpFetcher::new(HttpConfig {
            timeout: Duration::from_millis(1500),
        })
        .unwrap();
        assert!(format!("{:?}", fetcher).contains("1.5s"));
    }

    #[test]
    fn test_user_agent_names_crate() {
        assert!(USER_AGENT.starts_with("dexpull/"));
    }

    #[test]
    fn test_debug_impl() {
        let fetcher = HttpFetcher::new(HttpConfig::default()).unwrap();
        let debug_str = format!("{:?}", fetcher);
        assert!(debug_str.contains("HttpFetcher"));
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpFetcher>();
    }

    #[tokio::test]
    async fn test_probe_of_unreachable_host_is_not_found() {
        let fetcher = HttpFetcher::new(HttpConfig::default()).unwrap();
        // Port 9 on localhost (discard) is not expected to serve HTTP
        let found = fetcher
            .exists("http://127.0.0.1:9/sprite.gif", Duration::from_millis(200))
            .await;
        assert!(!found);
    }

    #[tokio::test]
    async fn test_get_json_returns_body() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 8\r\nConnection: close\r\n\r\n{\"id\":1}",
        )
        .await;
        let fetcher = HttpFetcher::new(HttpConfig::default()).unwrap();

        let body = fetcher.get_json(&url).await.unwrap();

        assert_eq!(body["id"], 1);
    }

    #[tokio::test]
    async fn test_get_json_maps_non_success_to_status() {
        let url = serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await;
        let fetcher = HttpFetcher::new(HttpConfig::default()).unwrap();

        let err = fetcher.get_json(&url).await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains(&url));
    }

    #[tokio::test]
    async fn test_get_json_maps_bad_body_to_parse() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 8\r\nConnection: close\r\n\r\nnot json",
        )
        .await;
        let fetcher = HttpFetcher::new(HttpConfig::default()).unwrap();

        let err = fetcher.get_json(&url).await.unwrap_err();

        assert!(matches!(err, HarvestError::Parse(_)));
    }

    #[tokio::test]
    async fn test_exists_only_on_ok() {
        let url = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await;
        let fetcher = HttpFetcher::new(HttpConfig::default()).unwrap();
        assert!(fetcher.exists(&url, Duration::from_secs(2)).await);

        let url = serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await;
        assert!(!fetcher.exists(&url, Duration::from_secs(2)).await);
    }
}
