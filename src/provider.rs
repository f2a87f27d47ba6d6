//! Suggestion provider trait and configuration.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Configuration for a suggestion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Stable identifier (e.g., "baidu").
    pub id: String,
    /// Display name of the provider.
    pub name: String,
    /// Endpoint template containing `{query}` and optionally `{callback}`.
    pub endpoint: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Maximum number of suggestions kept from one response.
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    /// Whether the provider takes part in fan-outs.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_timeout() -> u64 {
    5
}

fn default_max_suggestions() -> usize {
    8
}

fn default_enabled() -> bool {
    true
}

impl ProviderConfig {
    /// Creates a configuration with default timeout and limits.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            endpoint: endpoint.into(),
            timeout: default_timeout(),
            max_suggestions: default_max_suggestions(),
            enabled: default_enabled(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new("", "", "")
    }
}

/// Trait for implementing suggestion providers.
///
/// A provider turns a query into the ordered list of completions returned by
/// one third-party autocomplete endpoint. Timeouts and truncation are applied
/// by [`SuggestionClient`](crate::SuggestionClient), not by the provider.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Returns the provider configuration.
    fn config(&self) -> &ProviderConfig;

    /// Fetches and parses suggestions for the query.
    async fn suggest(&self, query: &str) -> Result<Vec<String>>;

    /// Returns the provider id.
    fn id(&self) -> &str {
        &self.config().id
    }

    /// Returns the display name.
    fn name(&self) -> &str {
        &self.config().name
    }

    /// Returns the request timeout.
    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config().timeout)
    }

    /// Returns whether the provider is enabled.
    fn is_enabled(&self) -> bool {
        self.config().enabled
    }
}
