//! Quick-search prefix parsing.
//!
//! Typing `s <keyword>` asks for the keyword to be dispatched to every
//! engine at once instead of picking one autocomplete row.

use serde::{Deserialize, Serialize};

use crate::SuggestionItem;

const PREFIX: &str = "s ";

/// Result of parsing a raw input for the quick-search prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickSearch {
    pub is_quick_search: bool,
    pub keyword: String,
}

/// Detects a case-insensitive `s ` prefix followed by at least one character.
///
/// The prefix is stripped and the remainder trimmed. Any other input yields
/// the trimmed input as keyword.
pub fn parse_quick_search(input: &str) -> QuickSearch {
    let trimmed = input.trim();

    let has_prefix = trimmed
        .get(..PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(PREFIX));

    if has_prefix && trimmed.len() > PREFIX.len() {
        return QuickSearch {
            is_quick_search: true,
            keyword: trimmed[PREFIX.len()..].trim().to_string(),
        };
    }

    QuickSearch {
        is_quick_search: false,
        keyword: trimmed.to_string(),
    }
}

/// Builds the quick-search pseudo-entry proposed by every provider.
pub fn quick_search_entry(keyword: &str, provider_ids: &[String]) -> Option<SuggestionItem> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return None;
    }
    Some(SuggestionItem {
        text: keyword.to_string(),
        sources: provider_ids.to_vec(),
        is_quick_search: true,
    })
}
