//! Near-duplicate merging and ranking of suggestions.

use std::cmp::Ordering;

use crate::similarity::{are_similar, DEFAULT_THRESHOLD};
use crate::{MergedSuggestion, SuggestionItem};

/// Default number of merged rows handed to the presentation layer.
pub const DEFAULT_MAX_RESULTS: usize = 8;

/// Merges near-duplicate items with the default similarity threshold.
pub fn merge_similar_suggestions(items: &[SuggestionItem]) -> Vec<MergedSuggestion> {
    merge_with_threshold(items, DEFAULT_THRESHOLD)
}

/// Folds every item similar to an earlier, still unmerged item into it.
///
/// Similarity is always measured against the group's first item, so
/// grouping is not transitive. Source ids are unioned in first-seen order
/// and absorbed items are never emitted on their own.
pub fn merge_with_threshold(items: &[SuggestionItem], threshold: f64) -> Vec<MergedSuggestion> {
    let mut processed = vec![false; items.len()];
    let mut merged = Vec::new();

    for (i, current) in items.iter().enumerate() {
        if processed[i] {
            continue;
        }
        processed[i] = true;

        let mut group = MergedSuggestion::from_item(current);
        for (j, other) in items.iter().enumerate().skip(i + 1) {
            if processed[j] {
                continue;
            }
            if are_similar(&current.text, &other.text, threshold) {
                group.add_sources(&other.sources);
                group.is_quick_search |= other.is_quick_search;
                processed[j] = true;
            }
        }

        merged.push(group);
    }

    merged
}

/// Drops blank rows, ranks the rest and keeps at most `max_results`.
///
/// Ranking is a stable sort on: quick-search entries first, then multi-source
/// entries, then descending source count. Ties keep their input order.
pub fn filter_and_sort_suggestions(
    merged: Vec<MergedSuggestion>,
    max_results: usize,
) -> Vec<MergedSuggestion> {
    let mut kept: Vec<MergedSuggestion> = merged
        .into_iter()
        .filter(|suggestion| !suggestion.text.trim().is_empty())
        .collect();

    kept.sort_by(rank);
    kept.truncate(max_results);
    kept
}

fn rank(a: &MergedSuggestion, b: &MergedSuggestion) -> Ordering {
    b.is_quick_search
        .cmp(&a.is_quick_search)
        .then_with(|| b.is_duplicated.cmp(&a.is_duplicated))
        .then_with(|| b.source_count().cmp(&a.source_count()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(text: &str, source: &str) -> SuggestionItem {
        SuggestionItem::new(text, source)
    }

    fn merged(text: &str, sources: &[&str], quick: bool) -> MergedSuggestion {
        let mut m = MergedSuggestion::from_item(&SuggestionItem {
            text: text.to_string(),
            sources: vec![],
            is_quick_search: quick,
        });
        m.add_sources(&sources.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        m
    }

    #[test]
    fn test_merge_weather_example() {
        let items = vec![
            item("天气", "baidu"),
            item("天气预报", "google"),
            item("天气", "bing"),
        ];
        let result = merge_similar_suggestions(&items);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].text, "天气");
        assert_eq!(result[0].sources, vec!["baidu", "bing"]);
        assert!(result[0].is_duplicated);
        assert_eq!(result[1].text, "天气预报");
        assert!(!result[1].is_duplicated);
    }

    #[test]
    fn test_merge_case_insensitive_exact() {
        let items = vec![item("ChatGPT", "google"), item("chatgpt", "bing")];
        let result = merge_similar_suggestions(&items);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text, "ChatGPT");
        assert_eq!(result[0].sources, vec!["google", "bing"]);
        assert!(result[0].is_duplicated);
    }

    #[test]
    fn test_merge_space_insensitive() {
        let items = vec![item("苹果手机", "baidu"), item("苹果 手机", "so360")];
        let result = merge_similar_suggestions(&items);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].sources.len(), 2);
    }

    #[test]
    fn test_merge_same_source_twice() {
        let items = vec![item("rust", "baidu"), item("Rust", "baidu")];
        let result = merge_similar_suggestions(&items);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].sources, vec!["baidu"]);
        assert!(!result[0].is_duplicated);
    }

    #[test]
    fn test_merge_is_not_transitive() {
        // head ~ near (0.9) and near ~ far (0.9), but head vs far is only 0.8
        let items = vec![
            item("abcdefghij", "a"),
            item("abcdefghyx", "c"),
            item("abcdefghix", "b"),
        ];
        let result = merge_with_threshold(&items, 0.85);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].text, "abcdefghij");
        assert_eq!(result[0].sources, vec!["a", "b"]);
        assert_eq!(result[1].text, "abcdefghyx");
    }

    #[test]
    fn test_merge_keeps_quick_flag() {
        let items = vec![
            SuggestionItem {
                text: "猫".to_string(),
                sources: vec!["baidu".to_string(), "google".to_string()],
                is_quick_search: true,
            },
            item("猫", "bing"),
        ];
        let result = merge_similar_suggestions(&items);
        assert_eq!(result.len(), 1);
        assert!(result[0].is_quick_search);
        assert_eq!(result[0].sources, vec!["baidu", "google", "bing"]);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_similar_suggestions(&[]).is_empty());
    }

    #[test]
    fn test_filter_drops_blank() {
        let input = vec![merged("  ", &["a"], false), merged("x", &["a"], false)];
        let result = filter_and_sort_suggestions(input, 8);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text, "x");
    }

    #[test]
    fn test_sort_order() {
        let input = vec![
            merged("single", &["a"], false),
            merged("triple", &["a", "b", "c"], false),
            merged("double", &["a", "b"], false),
            merged("quick", &["a"], true),
        ];
        let result = filter_and_sort_suggestions(input, 8);
        let texts: Vec<&str> = result.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["quick", "triple", "double", "single"]);
    }

    #[test]
    fn test_sort_is_stable() {
        let input = vec![
            merged("first", &["a"], false),
            merged("second", &["b"], false),
            merged("third", &["c"], false),
        ];
        let result = filter_and_sort_suggestions(input, 8);
        let texts: Vec<&str> = result.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_truncates_to_max_results() {
        let input: Vec<MergedSuggestion> = (0..20)
            .map(|i| merged(&format!("s{}", i), &["a"], false))
            .collect();
        assert_eq!(filter_and_sort_suggestions(input.clone(), 8).len(), 8);
        assert_eq!(filter_and_sort_suggestions(input, 3).len(), 3);
    }

    #[test]
    fn test_quick_first_for_any_rotation() {
        let base = vec![
            merged("a", &["x", "y"], false),
            merged("q", &["x"], true),
            merged("b", &["x"], false),
            merged("c", &["x", "y", "z"], false),
        ];
        for shift in 0..base.len() {
            let mut input = base.clone();
            input.rotate_left(shift);
            let result = filter_and_sort_suggestions(input, 8);
            assert!(result[0].is_quick_search);
            assert!(result[1..].iter().all(|m| !m.is_quick_search));
            assert!(result[1].is_duplicated && result[2].is_duplicated);
            assert!(!result[3].is_duplicated);
        }
    }
}
