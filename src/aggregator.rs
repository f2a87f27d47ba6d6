//! Concurrent fan-out across providers and exact-text deduplication.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::fetch_from;
use crate::suggestion::{hot_searches, HotCategory};
use crate::{RawSuggestion, Result, SuggestError, SuggestionClient, SuggestionProvider};

/// Configuration for the fan-out aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Maximum number of suggestions returned by a fan-out.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    12
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

/// Collects suggestions from every enabled provider concurrently.
///
/// A failing provider contributes nothing and never aborts the others.
#[derive(Clone, Default)]
pub struct Aggregator {
    client: SuggestionClient,
    config: AggregatorConfig,
}

impl Aggregator {
    /// Creates an aggregator with no providers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an aggregator over an existing client.
    pub fn with_client(client: SuggestionClient) -> Self {
        Self {
            client,
            config: AggregatorConfig::default(),
        }
    }

    /// Sets the aggregator configuration.
    pub fn with_config(mut self, config: AggregatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds a provider.
    pub fn add_provider<P: SuggestionProvider + 'static>(&mut self, provider: P) {
        self.client.add_provider(provider);
    }

    /// Returns the underlying single-provider client.
    pub fn client(&self) -> &SuggestionClient {
        &self.client
    }

    /// Returns the number of registered providers.
    pub fn provider_count(&self) -> usize {
        self.client.providers().len()
    }

    /// Returns the ids of enabled providers in fan-out order.
    pub fn provider_ids(&self) -> Vec<String> {
        self.client.provider_ids()
    }

    /// Resolves a provider's display name.
    pub fn provider_name(&self, id: &str) -> Option<&str> {
        self.client.provider(id).map(|p| p.name())
    }

    /// Fetches from every enabled provider and merges exact duplicates.
    ///
    /// An empty or whitespace query returns the "all" hot-search list without
    /// any network call. Duplicates are detected on lowercased text and the
    /// first-seen entry wins. Fails only when every provider failed.
    pub async fn fetch_all_suggestions(&self, query: &str) -> Result<Vec<RawSuggestion>> {
        if query.trim().is_empty() {
            return Ok(hot_searches(HotCategory::All));
        }

        let providers: Vec<Arc<dyn SuggestionProvider>> = self
            .client
            .providers()
            .iter()
            .filter(|p| p.is_enabled())
            .cloned()
            .collect();

        if providers.is_empty() {
            return Err(SuggestError::NoProviders);
        }

        debug!("Fetching suggestions from {} providers", providers.len());

        let futures: Vec<_> = providers
            .iter()
            .map(|provider| async move {
                match fetch_from(provider.as_ref(), query).await {
                    Ok(suggestions) => Some((provider.id().to_string(), suggestions)),
                    Err(e) => {
                        warn!("Provider {} failed: {}", provider.id(), e);
                        None
                    }
                }
            })
            .collect();

        let settled = join_all(futures).await;
        let succeeded = settled.iter().filter(|r| r.is_some()).count();
        if succeeded == 0 {
            return Err(SuggestError::AllProvidersFailed);
        }

        let collected = settled
            .into_iter()
            .flatten()
            .flat_map(|(id, suggestions)| {
                suggestions
                    .into_iter()
                    .map(move |text| RawSuggestion::new(text, id.clone()))
            });

        Ok(self.dedup(collected))
    }

    /// Fetches from a single provider; an empty query yields the "general"
    /// hot-search list.
    pub async fn fetch_single(&self, query: &str, source_id: &str) -> Result<Vec<RawSuggestion>> {
        if query.trim().is_empty() {
            return Ok(hot_searches(HotCategory::General));
        }

        let suggestions = self.client.fetch_suggestions(query, source_id).await?;
        Ok(suggestions
            .into_iter()
            .map(|text| RawSuggestion::new(text, source_id))
            .collect())
    }

    fn dedup(&self, suggestions: impl IntoIterator<Item = RawSuggestion>) -> Vec<RawSuggestion> {
        let mut seen = HashSet::new();
        suggestions
            .into_iter()
            .filter(|s| seen.insert(s.text.to_lowercase()))
            .take(self.config.max_results)
            .collect()
    }
}
