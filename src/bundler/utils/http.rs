//! HTTP utilities for the release feed.
//!
//! Wraps a `reqwest` client with a request timeout and optional bearer
//! authentication applied to every request.

use crate::bundler::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP client used for release metadata and asset downloads.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    token: Option<String>,
}

impl HttpClient {
    /// Creates a client whose requests fail after `timeout`.
    pub fn new(timeout: Duration, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self { client, token })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }

    /// Fetches `url` and decodes the body as JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        log::debug!("Fetching {}", url);
        Ok(self.get(url).await?.json().await?)
    }

    /// Downloads a file from a URL into memory.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        log::info!("Downloading {}", url);
        let bytes = self.get(url).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}
