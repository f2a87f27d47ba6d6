//! # a3s-suggest
//!
//! An embeddable search-suggestion aggregator.
//!
//! This library fans a partial query out to several public suggestion
//! endpoints and folds the answers into one ranked list, with support for:
//!
//! - Async parallel fetching with per-provider timeouts
//! - Exact and near-duplicate merging across providers
//! - Quick-search prefix detection (`"s keyword"`)
//! - Debounced, cached, stale-safe sessions for search boxes
//! - Extensible provider interface
//!
//! ## Example
//!
//! ```rust,no_run
//! use a3s_suggest::{providers::{Baidu, Google}, Aggregator};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut aggregator = Aggregator::new();
//!     aggregator.add_provider(Baidu::new());
//!     aggregator.add_provider(Google::new());
//!
//!     for suggestion in aggregator.fetch_all_suggestions("rust").await? {
//!         println!("{} ({})", suggestion.text, suggestion.source_id);
//!     }
//!     Ok(())
//! }
//! ```

mod aggregator;
mod cache;
mod client;
mod error;
mod fetcher_http;
mod merge;
mod provider;
mod quick;
mod session;
mod suggestion;

pub mod fetcher;
pub mod jsonp;
pub mod providers;
pub mod similarity;

pub use aggregator::{Aggregator, AggregatorConfig};
pub use cache::{CacheKey, SuggestionCache};
pub use client::SuggestionClient;
pub use error::{Result, SuggestError};
pub use fetcher::Fetcher;
pub use fetcher_http::HttpFetcher;
pub use merge::{filter_and_sort_suggestions, merge_similar_suggestions, merge_with_threshold};
pub use provider::{ProviderConfig, SuggestionProvider};
pub use quick::{parse_quick_search, quick_search_entry, QuickSearch};
pub use session::{
    SessionConfig, SessionPhase, SuggestMode, SuggestionSession, SuggestionSnapshot, FETCH_ERROR,
};
pub use similarity::{are_similar, similarity};
pub use suggestion::{
    hot_searches, HotCategory, MergedSuggestion, RawSuggestion, SuggestionItem, QUICK_SOURCE_ID,
};
