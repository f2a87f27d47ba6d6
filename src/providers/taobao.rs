//! Taobao suggestion provider (淘宝).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::fetcher::Fetcher;
use crate::{jsonp, HttpFetcher, ProviderConfig, Result, SuggestError, SuggestionProvider};

/// Taobao product suggestion provider.
///
/// Each entry of `result` is a `[text, count]` pair.
pub struct Taobao {
    config: ProviderConfig,
    fetcher: Arc<dyn Fetcher>,
}

impl Taobao {
    /// Creates a new Taobao provider with a default HTTP fetcher.
    pub fn new() -> Self {
        Self::with_fetcher(Arc::new(HttpFetcher::new()))
    }

    /// Creates a new Taobao provider with a custom fetcher.
    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config: ProviderConfig::new(
                "taobao",
                "淘宝",
                "https://suggest.taobao.com/sug?code=utf-8&q={query}&callback={callback}",
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
        let items = value
            .get("result")
            .and_then(Value::as_array)
            .ok_or_else(|| SuggestError::Parse("Taobao payload has no `result` list".to_string()))?;

        Ok(items
            .iter()
            .filter_map(|pair| pair.get(0).and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }
}

impl Default for Taobao {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SuggestionProvider for Taobao {
    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn suggest(&self, query: &str) -> Result<Vec<String>> {
        let (body, callback) = super::request(&self.config, self.fetcher.as_ref(), query).await?;
        let value = jsonp::unwrap(&body, &callback)?;
        self.parse_suggestions(&value)
    }
}
