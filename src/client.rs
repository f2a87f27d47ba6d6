//! Single-provider suggestion requests.

use std::sync::Arc;

use tokio::time::timeout;
use tracing::debug;

use crate::{Result, SuggestError, SuggestionProvider};

/// Registry of providers that issues one suggestion request at a time.
///
/// Each call is bounded by the provider's timeout and truncated to its
/// `max_suggestions`. The request owns its response; nothing outlives the
/// call.
#[derive(Clone, Default)]
pub struct SuggestionClient {
    providers: Vec<Arc<dyn SuggestionProvider>>,
}

impl SuggestionClient {
    /// Creates a client with no providers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a client from an ordered provider list.
    pub fn with_providers(providers: Vec<Arc<dyn SuggestionProvider>>) -> Self {
        Self { providers }
    }

    /// Adds a provider.
    pub fn add_provider<P: SuggestionProvider + 'static>(&mut self, provider: P) {
        self.providers.push(Arc::new(provider));
    }

    /// Adds an already shared provider.
    pub fn add_shared(&mut self, provider: Arc<dyn SuggestionProvider>) {
        self.providers.push(provider);
    }

    /// Returns all registered providers in registration order.
    pub fn providers(&self) -> &[Arc<dyn SuggestionProvider>] {
        &self.providers
    }

    /// Looks up a provider by id.
    pub fn provider(&self, id: &str) -> Option<&Arc<dyn SuggestionProvider>> {
        self.providers.iter().find(|p| p.id() == id)
    }

    /// Returns the ids of enabled providers.
    pub fn provider_ids(&self) -> Vec<String> {
        self.providers
            .iter()
            .filter(|p| p.is_enabled())
            .map(|p| p.id().to_string())
            .collect()
    }

    /// Fetches suggestions for `query` from the provider registered as `source_id`.
    pub async fn fetch_suggestions(&self, query: &str, source_id: &str) -> Result<Vec<String>> {
        let provider = self
            .provider(source_id)
            .ok_or_else(|| SuggestError::UnknownProvider(source_id.to_string()))?;
        fetch_from(provider.as_ref(), query).await
    }
}

/// Runs one provider call under its timeout and truncates the answer.
pub(crate) async fn fetch_from(
    provider: &dyn SuggestionProvider,
    query: &str,
) -> Result<Vec<String>> {
    match timeout(provider.timeout(), provider.suggest(query)).await {
        Ok(Ok(mut suggestions)) => {
            suggestions.truncate(provider.config().max_suggestions);
            debug!(
                "Provider {} returned {} suggestions",
                provider.id(),
                suggestions.len()
            );
            Ok(suggestions)
        }
        Ok(Err(e)) => Err(e),
        Err(_) => Err(SuggestError::Timeout),
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::mock::MockProvider;
    use super::*;

    #[tokio::test]
    async fn test_fetch_suggestions_known_provider() {
        let mut client = SuggestionClient::new();
        client.add_provider(MockProvider::new("a", &["{q} one", "{q} two"]));
        let results = client.fetch_suggestions("rust", "a").await.unwrap();
        assert_eq!(results, vec!["rust one", "rust two"]);
    }

    #[tokio::test]
    async fn test_fetch_suggestions_unknown_provider() {
        let client = SuggestionClient::new();
        let err = client.fetch_suggestions("rust", "nope").await.unwrap_err();
        assert!(matches!(err, SuggestError::UnknownProvider(id) if id == "nope"));
    }

    #[tokio::test]
    async fn test_fetch_suggestions_truncates() {
        let many: Vec<String> = (0..20).map(|i| format!("s{}", i)).collect();
        let refs: Vec<&str> = many.iter().map(String::as_str).collect();
        let mut client = SuggestionClient::new();
        client.add_provider(MockProvider::new("a", &refs));
        let results = client.fetch_suggestions("q", "a").await.unwrap();
        assert_eq!(results.len(), 8);
        assert_eq!(results[7], "s7");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_suggestions_timeout() {
        let mut client = SuggestionClient::new();
        client.add_provider(MockProvider::new("slow", &["x"]).with_delay(Duration::from_secs(6)));
        let err = client.fetch_suggestions("q", "slow").await.unwrap_err();
        assert!(matches!(err, SuggestError::Timeout));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_suggestions_within_timeout() {
        let mut client = SuggestionClient::new();
        client.add_provider(MockProvider::new("slow", &["x"]).with_delay(Duration::from_secs(4)));
        assert_eq!(client.fetch_suggestions("q", "slow").await.unwrap(), vec!["x"]);
    }

    #[tokio::test]
    async fn test_fetch_suggestions_propagates_parse_error() {
        let mut client = SuggestionClient::new();
        client.add_provider(MockProvider::failing("bad"));
        let err = client.fetch_suggestions("q", "bad").await.unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_provider_ids_skip_disabled() {
        let mut client = SuggestionClient::new();
        client.add_provider(MockProvider::new("a", &[]));
        client.add_provider(MockProvider::new("b", &[]).disabled());
        client.add_provider(MockProvider::new("c", &[]));
        assert_eq!(client.provider_ids(), vec!["a", "c"]);
        assert_eq!(client.providers().len(), 3);
        assert!(client.provider("b").is_some());
    }
}
