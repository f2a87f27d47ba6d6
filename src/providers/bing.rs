//! Bing suggestion provider (必应).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::fetcher::Fetcher;
use crate::{jsonp, HttpFetcher, ProviderConfig, Result, SuggestError, SuggestionProvider};

/// Bing suggestion provider.
///
/// Suggestions live under `AS.Results[0].Suggests[].Txt`. Bing omits
/// `Results` entirely when it has nothing to suggest, which is treated as an
/// empty answer rather than a parse failure.
pub struct Bing {
    config: ProviderConfig,
    fetcher: Arc<dyn Fetcher>,
}

impl Bing {
    /// Creates a new Bing provider with a default HTTP fetcher.
    pub fn new() -> Self {
        Self::with_fetcher(Arc::new(HttpFetcher::new()))
    }

    /// Creates a new Bing provider with a custom fetcher.
    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config: ProviderConfig::new(
                "bing",
                "必应",
                "https://sg1.api.bing.com/qsonhs.aspx?type=cb&cb={callback}&q={query}",
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
        let root = value
            .get("AS")
            .ok_or_else(|| SuggestError::Parse("Bing payload has no `AS` field".to_string()))?;

        let results = match root.get("Results") {
            Some(results) => results,
            None => return Ok(Vec::new()),
        };

        let suggests = results
            .get(0)
            .and_then(|group| group.get("Suggests"))
            .and_then(Value::as_array)
            .ok_or_else(|| SuggestError::Parse("Bing results have no `Suggests`".to_string()))?;

        Ok(suggests
            .iter()
            .filter_map(|item| item.get("Txt").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }
}

impl Default for Bing {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SuggestionProvider for Bing {
    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn suggest(&self, query: &str) -> Result<Vec<String>> {
        let (body, callback) = super::request(&self.config, self.fetcher.as_ref(), query).await?;
        let value = jsonp::unwrap(&body, &callback)?;
        self.parse_suggestions(&value)
    }
}
