//! Stats fetching: one HTTP GET per call, body returned as text.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;

pub const DEFAULT_STATS_URL: &str = "http://srv.msk01.gigacorp.local/_stats";

// Upper bound for one request, connect included
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error("failed to read body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Anything that can hand back one raw stats line.
pub trait StatsSource {
    fn fetch(&self) -> impl Future<Output = Result<String, FetchError>> + Send;
}

pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeout(url, FETCH_TIMEOUT)
    }

    /// A stalled request fails with `FetchError::Transport` once `timeout` elapses.
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Transport)?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl StatsSource for HttpSource {
    async fn fetch(&self) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(FetchError::Transport)?;
        if resp.status() != StatusCode::OK {
            return Err(FetchError::Status(resp.status()));
        }
        resp.text().await.map_err(FetchError::Body)
    }
}
