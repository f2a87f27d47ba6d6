//! Per-search-box suggestion session: debouncing, caching and stale-response
//! suppression on top of the fan-out aggregator.
//!
//! State machine: `Idle` -> `Debouncing` (timer armed) -> `Fetching` -> `Idle`.
//! Every keystroke bumps a request id; a fetch may only publish while its id
//! is still the latest, so the last keystroke always wins.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cache::{CacheKey, SuggestionCache};
use crate::merge::{filter_and_sort_suggestions, merge_with_threshold, DEFAULT_MAX_RESULTS};
use crate::quick::{parse_quick_search, quick_search_entry};
use crate::similarity::DEFAULT_THRESHOLD;
use crate::suggestion::{hot_searches, HotCategory, QUICK_SOURCE_ID};
use crate::{Aggregator, MergedSuggestion, RawSuggestion, Result, SuggestionItem};

/// Error message published when a fetch fails and hot searches are shown.
pub const FETCH_ERROR: &str = "Failed to fetch suggestions";

/// Session tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Quiet period after the last keystroke before fetching.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Lifetime of cached fetch results in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Maximum number of merged rows published.
    #[serde(default = "default_max_merged")]
    pub max_merged: usize,
    /// Similarity at which two suggestions are merged.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_max_merged() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_similarity_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            cache_ttl_secs: default_cache_ttl_secs(),
            max_merged: default_max_merged(),
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

/// Which fetch a session performs on each query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestMode {
    /// One provider, by id.
    Single(String),
    /// Fan out to every provider.
    All,
    /// Fan out with quick-search detection.
    #[default]
    Enhanced,
}

impl SuggestMode {
    fn cache_mode(&self) -> String {
        match self {
            SuggestMode::Single(id) => format!("single:{}", id),
            SuggestMode::All => "all".to_string(),
            SuggestMode::Enhanced => "enhanced".to_string(),
        }
    }

    fn hot_category(&self) -> HotCategory {
        match self {
            SuggestMode::Single(_) => HotCategory::General,
            SuggestMode::All | SuggestMode::Enhanced => HotCategory::All,
        }
    }
}

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Nothing pending; the last snapshot is final.
    Idle,
    /// Debounce timer armed for the current query.
    Debouncing,
    /// Aggregator call in flight.
    Fetching,
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSnapshot {
    /// Query the snapshot belongs to.
    pub query: String,
    /// Flat suggestion list (or hot searches).
    pub suggestions: Vec<RawSuggestion>,
    /// Merged and ranked rows.
    pub merged_suggestions: Vec<MergedSuggestion>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub is_quick_search: bool,
}

struct SessionState {
    current_query: String,
    mode: SuggestMode,
    last_request_id: u64,
    pending_timer: Option<CancellationToken>,
    phase: SessionPhase,
    cache: SuggestionCache,
}

struct Shared {
    aggregator: Aggregator,
    config: SessionConfig,
    state: Mutex<SessionState>,
    snapshot: watch::Sender<SuggestionSnapshot>,
}

/// Parsed view of the current query.
struct QueryPlan {
    query: String,
    keyword: String,
    is_quick_search: bool,
    mode: SuggestMode,
}

impl QueryPlan {
    fn new(query: &str, mode: &SuggestMode) -> Self {
        let (keyword, is_quick_search) = match mode {
            SuggestMode::Enhanced => {
                let parsed = parse_quick_search(query);
                (parsed.keyword, parsed.is_quick_search)
            }
            _ => (query.trim().to_string(), false),
        };
        Self {
            query: query.to_string(),
            keyword,
            is_quick_search,
            mode: mode.clone(),
        }
    }

    fn cache_key(&self) -> CacheKey {
        CacheKey::new(self.mode.cache_mode(), &self.query)
    }
}

/// Suggestion controller bound to one search box.
///
/// Owns the session state and the cache; published snapshots can be read
/// with [`snapshot`](Self::snapshot) or observed through
/// [`subscribe`](Self::subscribe).
pub struct SuggestionSession {
    shared: Arc<Shared>,
}

impl SuggestionSession {
    /// Creates an enhanced-mode session with default configuration.
    pub fn new(aggregator: Aggregator) -> Self {
        Self::with_config(aggregator, SessionConfig::default())
    }

    /// Creates an enhanced-mode session with the given configuration.
    pub fn with_config(aggregator: Aggregator, config: SessionConfig) -> Self {
        let (snapshot, _) = watch::channel(SuggestionSnapshot::default());
        let cache = SuggestionCache::new(Duration::from_secs(config.cache_ttl_secs));
        Self {
            shared: Arc::new(Shared {
                aggregator,
                config,
                state: Mutex::new(SessionState {
                    current_query: String::new(),
                    mode: SuggestMode::default(),
                    last_request_id: 0,
                    pending_timer: None,
                    phase: SessionPhase::Idle,
                    cache,
                }),
                snapshot,
            }),
        }
    }

    /// Switches the fetch mode for subsequent queries.
    pub async fn set_mode(&self, mode: SuggestMode) {
        self.shared.state.lock().await.mode = mode;
    }

    /// Handles an edit of the search box.
    ///
    /// Cancels any armed debounce timer. Empty input and cache hits publish
    /// immediately; otherwise a fetch is scheduled after the debounce delay.
    pub async fn on_query_change(&self, text: &str) {
        let mut state = self.shared.state.lock().await;

        if let Some(timer) = state.pending_timer.take() {
            timer.cancel();
        }
        state.last_request_id += 1;
        let request_id = state.last_request_id;
        state.current_query = text.to_string();

        let plan = QueryPlan::new(text, &state.mode);

        if plan.keyword.is_empty() {
            state.phase = SessionPhase::Idle;
            self.shared.publish(SuggestionSnapshot {
                query: plan.query,
                suggestions: hot_searches(plan.mode.hot_category()),
                merged_suggestions: Vec::new(),
                is_loading: false,
                error: None,
                is_quick_search: plan.is_quick_search,
            });
            return;
        }

        if let Some(cached) = state.cache.get(&plan.cache_key()) {
            debug!("Cache hit for '{}'", plan.query);
            state.phase = SessionPhase::Idle;
            self.shared.publish(self.shared.build_snapshot(&plan, cached));
            return;
        }

        let token = CancellationToken::new();
        state.pending_timer = Some(token.clone());
        state.phase = SessionPhase::Debouncing;
        drop(state);

        let shared = Arc::clone(&self.shared);
        let delay = Duration::from_millis(self.shared.config.debounce_ms);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("Debounce for request {} cancelled", request_id);
                }
                _ = tokio::time::sleep(delay) => {
                    shared.run_fetch(request_id).await;
                }
            }
        });
    }

    /// Re-evaluates the current query, e.g. when the search box gains focus.
    pub async fn on_focus(&self) {
        let query = self.shared.state.lock().await.current_query.clone();
        self.on_query_change(&query).await;
    }

    /// Fires an armed debounce timer immediately and waits for its fetch.
    pub async fn flush(&self) {
        let request_id = {
            let mut state = self.shared.state.lock().await;
            match state.pending_timer.take() {
                Some(timer) => {
                    timer.cancel();
                    state.last_request_id
                }
                None => return,
            }
        };
        self.shared.run_fetch(request_id).await;
    }

    /// Evaluates a query without waiting for the debounce delay.
    ///
    /// Runs the same path as a keystroke followed by [`flush`](Self::flush),
    /// so cache hits, quick-search entries and failure fallbacks all apply.
    pub async fn evaluate(&self, text: &str) -> SuggestionSnapshot {
        self.on_query_change(text).await;
        self.flush().await;
        self.snapshot()
    }

    /// Drops the armed timer and invalidates any in-flight fetch.
    pub async fn cancel(&self) {
        let mut state = self.shared.state.lock().await;
        if let Some(timer) = state.pending_timer.take() {
            timer.cancel();
        }
        state.last_request_id += 1;
        state.phase = SessionPhase::Idle;
        self.shared.snapshot.send_modify(|s| s.is_loading = false);
    }

    /// Returns the current phase.
    pub async fn phase(&self) -> SessionPhase {
        self.shared.state.lock().await.phase
    }

    /// Returns the last published snapshot.
    pub fn snapshot(&self) -> SuggestionSnapshot {
        self.shared.snapshot.borrow().clone()
    }

    /// Subscribes to published snapshots.
    pub fn subscribe(&self) -> watch::Receiver<SuggestionSnapshot> {
        self.shared.snapshot.subscribe()
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.shared.config
    }

    /// Returns the aggregator the session fetches through.
    pub fn aggregator(&self) -> &Aggregator {
        &self.shared.aggregator
    }
}

impl Drop for SuggestionSession {
    fn drop(&mut self) {
        if let Ok(mut state) = self.shared.state.try_lock() {
            if let Some(timer) = state.pending_timer.take() {
                timer.cancel();
            }
        }
    }
}

impl Shared {
    fn publish(&self, snapshot: SuggestionSnapshot) {
        self.snapshot.send_replace(snapshot);
    }

    async fn fetch(&self, plan: &QueryPlan) -> Result<Vec<RawSuggestion>> {
        match &plan.mode {
            SuggestMode::Single(id) => self.aggregator.fetch_single(&plan.keyword, id).await,
            SuggestMode::All | SuggestMode::Enhanced => {
                self.aggregator.fetch_all_suggestions(&plan.keyword).await
            }
        }
    }

    async fn run_fetch(&self, request_id: u64) {
        let plan = {
            let mut state = self.state.lock().await;
            if state.last_request_id != request_id {
                debug!("Skipping superseded request {}", request_id);
                return;
            }
            state.pending_timer = None;
            state.phase = SessionPhase::Fetching;
            let plan = QueryPlan::new(&state.current_query, &state.mode);
            self.snapshot.send_modify(|s| {
                s.query = plan.query.clone();
                s.is_loading = true;
                s.error = None;
                s.is_quick_search = plan.is_quick_search;
            });
            plan
        };

        debug!("Fetching suggestions for '{}' (request {})", plan.keyword, request_id);
        let outcome = self.fetch(&plan).await;

        let mut state = self.state.lock().await;
        if state.last_request_id != request_id {
            debug!(
                "Discarding stale response for request {} (current: {})",
                request_id, state.last_request_id
            );
            return;
        }
        state.phase = SessionPhase::Idle;

        match outcome {
            Ok(raw) => {
                state.cache.insert(plan.cache_key(), raw.clone());
                self.publish(self.build_snapshot(&plan, raw));
            }
            Err(e) if plan.is_quick_search => {
                warn!("Fetching suggestions failed, showing quick search only: {}", e);
                self.publish(self.build_snapshot(&plan, Vec::new()));
            }
            Err(e) => {
                warn!("Fetching suggestions failed: {}", e);
                self.publish(SuggestionSnapshot {
                    query: plan.query,
                    suggestions: hot_searches(plan.mode.hot_category()),
                    merged_suggestions: Vec::new(),
                    is_loading: false,
                    error: Some(FETCH_ERROR.to_string()),
                    is_quick_search: false,
                });
            }
        }
    }

    fn build_snapshot(&self, plan: &QueryPlan, raw: Vec<RawSuggestion>) -> SuggestionSnapshot {
        let mut suggestions = Vec::with_capacity(raw.len() + 1);
        let mut items = Vec::with_capacity(raw.len() + 1);

        if plan.is_quick_search {
            let provider_ids = self.aggregator.provider_ids();
            if let Some(entry) = quick_search_entry(&plan.keyword, &provider_ids) {
                suggestions.push(RawSuggestion::new(entry.text.clone(), QUICK_SOURCE_ID));
                items.push(entry);
            }
        }
        items.extend(raw.iter().map(SuggestionItem::from));
        suggestions.extend(raw);

        let merged = merge_with_threshold(&items, self.config.similarity_threshold);
        SuggestionSnapshot {
            query: plan.query.clone(),
            suggestions,
            merged_suggestions: filter_and_sort_suggestions(merged, self.config.max_merged),
            is_loading: false,
            error: None,
            is_quick_search: plan.is_quick_search,
        }
    }
}
