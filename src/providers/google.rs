//! Google suggestion provider.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::fetcher::Fetcher;
use crate::{jsonp, HttpFetcher, ProviderConfig, Result, SuggestError, SuggestionProvider};

/// Google autocomplete provider.
///
/// The `client=chrome` endpoint returns `[query, [suggestions...], ...]`.
pub struct Google {
    config: ProviderConfig,
    fetcher: Arc<dyn Fetcher>,
}

impl Google {
    /// Creates a new Google provider with a default HTTP fetcher.
    pub fn new() -> Self {
        Self::with_fetcher(Arc::new(HttpFetcher::new()))
    }

    /// Creates a new Google provider with a custom fetcher.
    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config: ProviderConfig::new(
                "google",
                "谷歌",
                "https://www.google.com/complete/search?client=chrome&q={query}&callback={callback}",
            ),
            fetcher,
        }
    }

    /// Creates with custom configuration.
    pub fn with_config(mut self, config: ProviderConfig) -> Self {
        self.config = config;
        self
    }

    fn parse_suggestions(&self, value: &Value) -> Result<Vec<String>> {
        match value.as_array() {
            Some(items) if items.len() > 1 && items[1].is_array() => jsonp::string_array(&items[1]),
            _ => Err(SuggestError::Parse(
                "Google payload is not [query, [suggestions]]".to_string(),
            )),
        }
    }
}

impl Default for Google {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SuggestionProvider for Google {
    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn suggest(&self, query: &str) -> Result<Vec<String>> {
        let (body, callback) = super::request(&self.config, self.fetcher.as_ref(), query).await?;
        let value = jsonp::unwrap(&body, &callback)?;
        self.parse_suggestions(&value)
    }
}
