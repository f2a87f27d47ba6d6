//! 360 Search suggestion provider (360搜索).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::fetcher::Fetcher;
use crate::{jsonp, HttpFetcher, ProviderConfig, Result, SuggestError, SuggestionProvider};

/// 360 Search suggestion provider.
pub struct So360 {
    config: ProviderConfig,
    fetcher: Arc<dyn Fetcher>,
}

impl So360 {
    /// Creates a new 360 Search provider with a default HTTP fetcher.
    pub fn new() -> Self {
        Self::with_fetcher(Arc::new(HttpFetcher::new()))
    }

    /// Creates a new 360 Search provider with a custom fetcher.
    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config: ProviderConfig::new(
                "so360",
                "360搜索",
                "https://sug.so.360.cn/suggest?callback={callback}&encodein=utf-8&encodeout=utf-8&format=json&fields=word&word={query}",
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
            .ok_or_else(|| SuggestError::Parse("360 payload has no `result` list".to_string()))?;

        Ok(items
            .iter()
            .filter_map(|item| item.get("word").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }
}

impl Default for So360 {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SuggestionProvider for So360 {
    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn suggest(&self, query: &str) -> Result<Vec<String>> {
        let (body, callback) = super::request(&self.config, self.fetcher.as_ref(), query).await?;
        let value = jsonp::unwrap(&body, &callback)?;
        self.parse_suggestions(&value)
    }
}
