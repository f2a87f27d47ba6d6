//! reqwest transport for suggestion endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use tracing::debug;

use crate::fetcher::Fetcher;
use crate::Result;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; a3s-suggest/0.1)";

/// Connection setup bound; the per-provider timeout covers the whole call.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Issues one GET per suggestion request and hands back the raw body.
///
/// JSONP bodies are returned untouched; unwrapping them is the provider's job.
/// Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(default_headers())
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    /// Uses a caller-supplied client, e.g. one with a proxy configured.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
    );
    headers
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let status = response.status();
        let body = response.text().await?;
        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(body)
    }
}
