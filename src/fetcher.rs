//! Transport abstraction for retrieving raw suggestion payloads.

use async_trait::async_trait;

use crate::Result;

/// Trait for fetching the raw response body of a URL.
///
/// Providers own a fetcher so tests can substitute canned payloads for the
/// network. Configuration such as the user-agent is set at construction time.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the body of the given URL as text.
    async fn fetch(&self, url: &str) -> Result<String>;
}
