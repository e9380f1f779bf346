//! Catalog API client with an in-memory response cache
//!
//! Resolves catalog resources to decoded records. Every request goes through the
//! shared `Cache` first; on a miss the raw response body is fetched, stored in the
//! cache as-is and only then decoded.

use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use super::{Creature, LocationArea};
use crate::cache::Cache;

/// Base URL for the public catalog API
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Where a payload that failed to decode came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadOrigin {
    Cache,
    Network,
}

impl fmt::Display for PayloadOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadOrigin::Cache => f.write_str("cached data"),
            PayloadOrigin::Network => f.write_str("response"),
        }
    }
}

/// Errors that can occur when fetching catalog resources
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request could not reach the service
    #[error("Network request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The connection succeeded but the body could not be read
    #[error("Failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status
    ///
    /// Kept apart from `Decode` on purpose: error bodies are not cached, so a
    /// missing record is retried on the next request instead of failing until expiry.
    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },

    /// The payload does not match the expected record shape
    #[error("Failed to decode {origin} for {url}: {source}")]
    Decode {
        url: String,
        origin: PayloadOrigin,
        #[source]
        source: serde_json::Error,
    },

    /// Backward paging was requested with no previous page known
    #[error("You are at the first page!")]
    NoPreviousPage,
}

/// Client for fetching records from the catalog service
#[derive(Debug, Clone)]
pub struct CatalogClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Response cache shared with the rest of the application
    cache: Arc<Cache>,
    /// Base URL for the API (allows override for testing)
    base_url: String,
}

impl CatalogClient {
    /// Creates a new CatalogClient backed by `cache`
    ///
    /// # Arguments
    /// * `base_url` - Service root, e.g. `https://pokeapi.co/api/v2`
    /// * `cache` - Cache that stores raw response bodies
    pub fn new(base_url: impl Into<String>, cache: Arc<Cache>) -> Self {
        Self::with_client(Client::new(), base_url, cache)
    }

    /// Creates a new CatalogClient with a custom HTTP client
    pub fn with_client(http_client: Client, base_url: impl Into<String>, cache: Arc<Cache>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            cache,
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cache(&self) -> &Arc<Cache> {
        &self.cache
    }

    /// URL of the first page of the location-area collection
    pub fn first_page_url(&self) -> String {
        format!("{}/location-area", self.base_url)
    }

    pub fn location_area_url(&self, name: &str) -> String {
        format!("{}/location-area/{}", self.base_url, name)
    }

    pub fn creature_url(&self, name: &str) -> String {
        format!("{}/pokemon/{}", self.base_url, name)
    }

    /// Fetches the detail record for a location area
    pub async fn location_area(&self, name: &str) -> Result<LocationArea, CatalogError> {
        self.fetch_resource(&self.location_area_url(name)).await
    }

    /// Fetches the detail record for a creature
    pub async fn creature(&self, name: &str) -> Result<Creature, CatalogError> {
        self.fetch_resource(&self.creature_url(name)).await
    }

    /// Resolves `url` to a decoded record, using the cache when possible
    ///
    /// # Behavior
    /// - A fresh cache entry is decoded and returned without any network call;
    ///   if it fails to decode, the error is returned and the entry stays cached
    /// - On a miss the resource is fetched once (no retries), the raw body is
    ///   cached before decoding, then decoded
    /// - Non-success responses are returned as `CatalogError::Status` and not cached
    pub async fn fetch_resource<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        if let Some(cached) = self.cache.get(url) {
            debug!(url, "serving from cache");
            return decode(url, &cached, PayloadOrigin::Cache);
        }

        debug!(url, "cache miss, fetching");
        let body = self.fetch_body(url).await?;
        self.cache.put(url, body.clone());

        decode(url, &body, PayloadOrigin::Network)
    }

    /// Performs the GET and reads the full body
    async fn fetch_body(&self, url: &str) -> Result<Bytes, CatalogError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|source| CatalogError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, %status, "catalog request was not successful");
            return Err(CatalogError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.bytes().await.map_err(|source| CatalogError::Body {
            url: url.to_string(),
            source,
        })
    }
}

fn decode<T: DeserializeOwned>(url: &str, payload: &[u8], origin: PayloadOrigin) -> Result<T, CatalogError> {
    serde_json::from_slice(payload).map_err(|source| CatalogError::Decode {
        url: url.to_string(),
        origin,
        source,
    })
}
