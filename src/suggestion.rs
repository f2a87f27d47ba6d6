//! Suggestion types.

use serde::{Deserialize, Serialize};

/// Source id carried by the synthesized quick-search entry.
pub const QUICK_SOURCE_ID: &str = "quick";

/// A single suggestion as returned by one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSuggestion {
    /// Suggested query text.
    pub text: String,
    /// Id of the provider that produced it.
    pub source_id: String,
}

impl RawSuggestion {
    /// Creates a new raw suggestion.
    pub fn new(text: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_id: source_id.into(),
        }
    }

    /// Returns true for the synthesized quick-search entry.
    pub fn is_quick_search(&self) -> bool {
        self.source_id == QUICK_SOURCE_ID
    }
}

/// Input to the merge step: a text with the sources that proposed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionItem {
    pub text: String,
    pub sources: Vec<String>,
    #[serde(default)]
    pub is_quick_search: bool,
}

impl SuggestionItem {
    /// Creates a single-source item.
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: vec![source.into()],
            is_quick_search: false,
        }
    }
}

impl From<&RawSuggestion> for SuggestionItem {
    fn from(raw: &RawSuggestion) -> Self {
        Self::new(raw.text.clone(), raw.source_id.clone())
    }
}

/// One displayable row standing for one or more near-duplicate suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedSuggestion {
    /// Text of the first suggestion of the group.
    pub text: String,
    /// Distinct source ids, in the order they were first seen.
    pub sources: Vec<String>,
    /// True when more than one source contributed.
    pub is_duplicated: bool,
    /// True for the quick-search entry.
    pub is_quick_search: bool,
}

impl MergedSuggestion {
    /// Starts a group from a single item.
    pub fn from_item(item: &SuggestionItem) -> Self {
        let mut merged = Self {
            text: item.text.clone(),
            sources: Vec::with_capacity(item.sources.len()),
            is_duplicated: false,
            is_quick_search: item.is_quick_search,
        };
        merged.add_sources(&item.sources);
        merged
    }

    /// Unions source ids into the group, skipping ones already present.
    pub fn add_sources(&mut self, sources: &[String]) {
        for source in sources {
            if !self.sources.contains(source) {
                self.sources.push(source.clone());
            }
        }
        self.is_duplicated = self.sources.len() > 1;
    }

    /// Returns the number of distinct sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}

/// Hot-search category used when the query is empty or a fetch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotCategory {
    /// Shown by single-provider sessions.
    #[default]
    General,
    /// Shown by fan-out sessions.
    All,
}

const HOT_GENERAL: [(&str, &str); 8] = [
    ("今日新闻", "baidu"),
    ("天气预报", "google"),
    ("股票行情", "bing"),
    ("汇率查询", "so360"),
    ("翻译工具", "taobao"),
    ("在线计算器", "baidu"),
    ("地图导航", "google"),
    ("音乐播放", "bing"),
];

const HOT_ALL: [(&str, &str); 12] = [
    ("人工智能", "baidu"),
    ("ChatGPT", "google"),
    ("编程学习", "bing"),
    ("数码产品", "so360"),
    ("手机推荐", "taobao"),
    ("编程教程", "baidu"),
    ("美食制作", "google"),
    ("购物优惠", "bing"),
    ("科技新闻", "so360"),
    ("学习资料", "taobao"),
    ("生活技巧", "baidu"),
    ("品牌特卖", "google"),
];

/// Returns the static hot-search list for a category.
pub fn hot_searches(category: HotCategory) -> Vec<RawSuggestion> {
    let table: &[(&str, &str)] = match category {
        HotCategory::General => &HOT_GENERAL,
        HotCategory::All => &HOT_ALL,
    };
    table
        .iter()
        .map(|(text, source)| RawSuggestion::new(*text, *source))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_suggestion_new() {
        let raw = RawSuggestion::new("天气", "baidu");
        assert_eq!(raw.text, "天气");
        assert_eq!(raw.source_id, "baidu");
        assert!(!raw.is_quick_search());
        assert!(RawSuggestion::new("猫", QUICK_SOURCE_ID).is_quick_search());
    }

    #[test]
    fn test_item_from_raw() {
        let item = SuggestionItem::from(&RawSuggestion::new("x", "bing"));
        assert_eq!(item.sources, vec!["bing"]);
        assert!(!item.is_quick_search);
    }

    #[test]
    fn test_merged_from_item() {
        let merged = MergedSuggestion::from_item(&SuggestionItem::new("x", "bing"));
        assert_eq!(merged.sources, vec!["bing"]);
        assert!(!merged.is_duplicated);
    }

    #[test]
    fn test_add_sources_dedups_and_keeps_order() {
        let mut merged = MergedSuggestion::from_item(&SuggestionItem::new("x", "baidu"));
        merged.add_sources(&["google".to_string(), "baidu".to_string()]);
        merged.add_sources(&["google".to_string()]);
        assert_eq!(merged.sources, vec!["baidu", "google"]);
        assert!(merged.is_duplicated);
        assert_eq!(merged.source_count(), 2);
    }

    #[test]
    fn test_same_source_is_not_duplicated() {
        let mut merged = MergedSuggestion::from_item(&SuggestionItem::new("x", "baidu"));
        merged.add_sources(&["baidu".to_string()]);
        assert!(!merged.is_duplicated);
    }

    #[test]
    fn test_hot_searches_sizes() {
        assert_eq!(hot_searches(HotCategory::General).len(), 8);
        assert_eq!(hot_searches(HotCategory::All).len(), 12);
        assert_eq!(hot_searches(HotCategory::General)[0].text, "今日新闻");
        assert_eq!(hot_searches(HotCategory::All)[1].source_id, "google");
    }

    #[test]
    fn test_hot_category_serialization() {
        assert_eq!(serde_json::to_string(&HotCategory::All).unwrap(), "\"all\"");
    }

    #[test]
    fn test_merged_serialization() {
        let merged = MergedSuggestion::from_item(&SuggestionItem::new("x", "baidu"));
        let json = serde_json::to_string(&merged).unwrap();
        assert!(json.contains("\"is_duplicated\":false"));
    }
}
