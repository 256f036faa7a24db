use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::headers::HeaderPool;
use crate::record::RawMajorRecord;

pub const DEFAULT_BASE_URL: &str = "https://static-data.gaokao.cn";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status: {0}")]
    Status(StatusCode),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Fetches one major's detail record from the public data feed.
///
/// Single attempt per call, bounded by [`REQUEST_TIMEOUT`]; no caching or retry.
#[derive(Debug, Clone)]
pub struct MajorFetcher {
    client: Client,
    headers: Arc<HeaderPool>,
    base_url: String,
}

impl MajorFetcher {
    pub fn new(headers: Arc<HeaderPool>) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            headers,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the fetcher at another host, e.g. a local mock of the feed.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn detail_url(&self, canonical_id: &str) -> String {
        format!(
            "{}/www/2.0/special/{}/pc_special_detail.json?a=www.gaokao.cn",
            self.base_url,
            urlencoding::encode(canonical_id)
        )
    }

    pub async fn fetch(&self, canonical_id: &str) -> Result<RawMajorRecord, FetchError> {
        let url = self.detail_url(canonical_id);
        tracing::debug!(%url, "fetching major detail");

        let mut request = self.client.get(&url);
        for (name, value) in self.headers.select() {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        let envelope: Value =
            serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))?;

        match envelope.get("data") {
            Some(Value::Object(data)) => Ok(RawMajorRecord::new(data.clone())),
            Some(_) => Err(FetchError::Malformed("`data` is not an object".to_string())),
            None => Err(FetchError::Malformed("missing `data` field".to_string())),
        }
    }
}
