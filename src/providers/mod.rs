//! Suggestion provider implementations.

use std::sync::Arc;

use crate::fetcher::Fetcher;
use crate::{jsonp, ProviderConfig, Result, SuggestionProvider};

mod baidu;
mod bing;
mod google;
mod so360;
mod sogou;
mod taobao;

pub use baidu::Baidu;
pub use bing::Bing;
pub use google::Google;
pub use so360::So360;
pub use sogou::Sogou;
pub use taobao::Taobao;

/// Ids of the providers used when none are selected explicitly.
pub const DEFAULT_PROVIDER_IDS: [&str; 5] = ["baidu", "google", "bing", "so360", "taobao"];

/// Creates the default provider set, in fan-out order.
pub fn default_providers() -> Vec<Arc<dyn SuggestionProvider>> {
    DEFAULT_PROVIDER_IDS
        .iter()
        .filter_map(|id| provider_by_id(id))
        .collect()
}

/// Creates a provider from its id or a common alias.
pub fn provider_by_id(id: &str) -> Option<Arc<dyn SuggestionProvider>> {
    let provider: Arc<dyn SuggestionProvider> = match id {
        "baidu" => Arc::new(Baidu::new()),
        "google" | "g" => Arc::new(Google::new()),
        "bing" => Arc::new(Bing::new()),
        "so360" | "360" => Arc::new(So360::new()),
        "taobao" => Arc::new(Taobao::new()),
        "sogou" => Arc::new(Sogou::new()),
        _ => return None,
    };
    Some(provider)
}

/// Issues one JSONP request and returns the body with the callback token used.
async fn request(
    config: &ProviderConfig,
    fetcher: &dyn Fetcher,
    query: &str,
) -> Result<(String, String)> {
    let callback = jsonp::callback_name();
    let url = jsonp::build_url(&config.endpoint, query, &callback)?;
    let body = fetcher.fetch(&url).await?;
    Ok((body, callback))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_providers() {
        let providers = default_providers();
        let ids: Vec<&str> = providers.iter().map(|p| p.id()).collect();
        assert_eq!(ids, DEFAULT_PROVIDER_IDS);
    }

    #[test]
    fn test_provider_by_id_aliases() {
        assert_eq!(provider_by_id("360").unwrap().id(), "so360");
        assert_eq!(provider_by_id("g").unwrap().id(), "google");
        assert_eq!(provider_by_id("sogou").unwrap().id(), "sogou");
        assert!(provider_by_id("yahoo").is_none());
    }

    #[test]
    fn test_provider_endpoints_are_templates() {
        for id in DEFAULT_PROVIDER_IDS {
            let provider = provider_by_id(id).unwrap();
            assert!(provider.config().endpoint.contains("{query}"), "{}", id);
            assert!(provider.config().endpoint.contains("{callback}"), "{}", id);
        }
    }
}
