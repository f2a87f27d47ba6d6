//! Error types for the suggestion library.

use thiserror::Error;

/// Result type alias for suggestion operations.
pub type Result<T> = std::result::Result<T, SuggestError>;

/// Errors that can occur while fetching or aggregating suggestions.
#[derive(Error, Debug)]
pub enum SuggestError {
    /// Provider did not answer within its timeout.
    #[error("Suggestion request timed out")]
    Timeout,

    /// Transport failure or non-success HTTP status.
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body did not have the expected shape.
    #[error("Failed to parse suggestions: {0}")]
    Parse(String),

    /// No provider is registered under the given id.
    #[error("Unknown suggestion provider: {0}")]
    UnknownProvider(String),

    /// No providers configured.
    #[error("No suggestion providers configured")]
    NoProviders,

    /// Every provider in a fan-out failed.
    #[error("All suggestion providers failed")]
    AllProvidersFailed,

    /// Expanded endpoint template is not a valid URL.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

impl SuggestError {
    /// Returns true for failures confined to a single provider call.
    ///
    /// These degrade that provider's contribution to an empty list instead of
    /// failing the whole fan-out.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SuggestError::Timeout | SuggestError::Network(_) | SuggestError::Parse(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_timeout() {
        let err = SuggestError::Timeout;
        assert_eq!(err.to_string(), "Suggestion request timed out");
    }

    #[test]
    fn test_error_display_parse() {
        let err = SuggestError::Parse("missing callback".to_string());
        assert_eq!(err.to_string(), "Failed to parse suggestions: missing callback");
    }

    #[test]
    fn test_error_display_unknown_provider() {
        let err = SuggestError::UnknownProvider("yahoo".to_string());
        assert_eq!(err.to_string(), "Unknown suggestion provider: yahoo");
    }

    #[test]
    fn test_error_display_no_providers() {
        assert_eq!(
            SuggestError::NoProviders.to_string(),
            "No suggestion providers configured"
        );
    }

    #[test]
    fn test_error_display_all_failed() {
        assert_eq!(
            SuggestError::AllProvidersFailed.to_string(),
            "All suggestion providers failed"
        );
    }

    #[test]
    fn test_error_from_url_parse() {
        let err: SuggestError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, SuggestError::UrlParse(_)));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(SuggestError::Timeout.is_recoverable());
        assert!(SuggestError::Parse("x".to_string()).is_recoverable());
        assert!(!SuggestError::NoProviders.is_recoverable());
        assert!(!SuggestError::AllProvidersFailed.is_recoverable());
        assert!(!SuggestError::UnknownProvider("x".to_string()).is_recoverable());
    }
}
