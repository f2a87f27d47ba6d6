//! Sogou suggestion provider (搜狗).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::fetcher::Fetcher;
use crate::{jsonp, HttpFetcher, ProviderConfig, Result, SuggestError, SuggestionProvider};

/// Sogou suggestion provider.
///
/// Sogou ignores caller-chosen callback names and always answers with
/// `window.sogou.sug([query, [suggestions...]], -1);`. Not part of the
/// default provider set.
pub struct Sogou {
    config: ProviderConfig,
    fetcher: Arc<dyn Fetcher>,
}

impl Sogou {
    /// Creates a new Sogou provider with a default HTTP fetcher.
    pub fn new() -> Self {
        Self::with_fetcher(Arc::new(HttpFetcher::new()))
    }

    /// Creates a new Sogou provider with a custom fetcher.
    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config: ProviderConfig::new(
                "sogou",
                "搜狗",
                "https://w.sugg.sogou.com/sugg/ajaj_json.jsp?key={query}&type=web",
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
        match value.get(1) {
            Some(list) if list.is_array() => jsonp::string_array(list),
            _ => Err(SuggestError::Parse(
                "Sogou payload is not [query, [suggestions]]".to_string(),
            )),
        }
    }
}

impl Default for Sogou {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SuggestionProvider for Sogou {
    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn suggest(&self, query: &str) -> Result<Vec<String>> {
        let (body, _) = super::request(&self.config, self.fetcher.as_ref(), query).await?;
        let value = jsonp::unwrap(&body, "window.sogou.sug")?;
        self.parse_suggestions(&value)
    }
}
