//! Baidu suggestion provider (百度).
//!
//! Baidu's `su` endpoint answers with a JavaScript object literal whose keys
//! are unquoted, so the payload is not always valid JSON. The `s` array is
//! extracted with a regex when JSON parsing fails.

use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;

use crate::fetcher::Fetcher;
use crate::{jsonp, HttpFetcher, ProviderConfig, Result, SuggestError, SuggestionProvider};

/// Baidu suggestion provider.
pub struct Baidu {
    config: ProviderConfig,
    fetcher: Arc<dyn Fetcher>,
}

impl Baidu {
    /// Creates a new Baidu provider with a default HTTP fetcher.
    pub fn new() -> Self {
        Self::with_fetcher(Arc::new(HttpFetcher::new()))
    }

    /// Creates a new Baidu provider with a custom fetcher.
    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config: ProviderConfig::new(
                "baidu",
                "百度",
                "https://suggestion.baidu.com/su?wd={query}&p=3&cb={callback}",
            ),
            fetcher,
        }
    }

    /// Creates with custom configuration.
    pub fn with_config(mut self, config: ProviderConfig) -> Self {
        self.config = config;
        self
    }

    fn parse_suggestions(&self, body: &str, callback: &str) -> Result<Vec<String>> {
        let payload = jsonp::extract_payload(body, callback)?;

        if let Ok(value) = jsonp::parse_payload(payload) {
            return match value.get("s") {
                Some(list) => jsonp::string_array(list),
                None => Err(SuggestError::Parse("Baidu payload has no `s` field".to_string())),
            };
        }

        let pattern = Regex::new(r#"(?:^|[{,])\s*"?s"?\s*:\s*(\[[^\]]*\])"#)
            .map_err(|e| SuggestError::Parse(format!("Failed to compile pattern: {}", e)))?;
        let list = pattern
            .captures(payload)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| SuggestError::Parse("Baidu payload has no `s` list".to_string()))?;
        let value: Value = serde_json::from_str(list.as_str())
            .map_err(|e| SuggestError::Parse(format!("invalid Baidu list: {}", e)))?;
        jsonp::string_array(&value)
    }
}

impl Default for Baidu {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SuggestionProvider for Baidu {
    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn suggest(&self, query: &str) -> Result<Vec<String>> {
        let (body, callback) = super::request(&self.config, self.fetcher.as_ref(), query).await?;
        self.parse_suggestions(&body, &callback)
    }
}
