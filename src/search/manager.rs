//! Hybrid search orchestration
//!
//! The manager runs keyword and/or semantic scoring over the knowledge
//! store, combines scores by the configured weights, applies filters, quality
//! boosting and thresholding, and caches the ranked result list. Search is
//! best-effort user-facing functionality: malformed input and provider
//! failures produce an empty result list and a statistics entry, never an
//! error to the caller.

use crate::search::cache::SearchCache;
use crate::search::keyword::keyword_score;
use crate::search::semantic::SemanticScorer;
use crate::search::weights::{optimize_weights, SearchFeedback, WeightRecommendation};
use crate::search::{SearchFilters, SearchResult, SearchType};
use crate::store::KnowledgeStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Instant;

/// Score multiplier per unit of quality when boost_high_quality is on:
/// a record with quality 1.0 scores 10% higher
const QUALITY_BOOST_FACTOR: f32 = 0.1;

/// Snippet length carried on results, matching the legacy corpus format
const SNIPPET_CHARS: usize = 500;

/// Search behavior configuration
///
/// Weights are accepted as given; a pair not summing to 1.0 merely rescales
/// all hybrid scores uniformly (a warning is logged at initialization).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Relative contribution of keyword matching in hybrid scoring
    pub keyword_weight: f32,

    /// Relative contribution of semantic similarity in hybrid scoring
    pub semantic_weight: f32,

    /// Ranked list is truncated to this many results
    pub max_results: usize,

    /// Bypass the result cache entirely when false
    pub cache_enabled: bool,

    /// Age after which a cached result list is considered expired
    pub cache_ttl_seconds: f64,

    /// Results scoring below this are dropped after combining
    pub min_score_threshold: f32,

    /// Multiply scores by `1 + quality_score * 0.1` for records that carry a
    /// quality score
    pub boost_high_quality: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            keyword_weight: 0.4,
            semantic_weight: 0.6,
            max_results: 10,
            cache_enabled: true,
            cache_ttl_seconds: 3600.0,
            min_score_threshold: 0.1,
            boost_high_quality: true,
        }
    }
}

/// Partial configuration merged into the live [`SearchConfig`] by
/// [`HybridSearchManager::configure`]; unset fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_weight: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_weight: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_ttl_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score_threshold: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost_high_quality: Option<bool>,
}

impl SearchOptions {
    fn apply(&self, config: &mut SearchConfig) {
        if let Some(v) = self.keyword_weight {
            config.keyword_weight = v;
        }
        if let Some(v) = self.semantic_weight {
            config.semantic_weight = v;
        }
        if let Some(v) = self.max_results {
            config.max_results = v;
        }
        if let Some(v) = self.cache_enabled {
            config.cache_enabled = v;
        }
        if let Some(v) = self.cache_ttl_seconds {
            config.cache_ttl_seconds = v;
        }
        if let Some(v) = self.min_score_threshold {
            config.min_score_threshold = v;
        }
        if let Some(v) = self.boost_high_quality {
            config.boost_high_quality = v;
        }
    }
}

/// Running search counters
///
/// Failure paths still count toward totals so operators can detect degraded
/// search quality from the stats alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchStats {
    pub total_searches: u64,
    pub keyword_searches: u64,
    pub semantic_searches: u64,
    pub hybrid_searches: u64,
    pub failed_searches: u64,
    pub cache_hits: u64,
    /// Arithmetic mean over all calls, cache hits included, in seconds
    pub average_response_time: f64,
}

/// Per-result scoring explanation (see [`HybridSearchManager::explain`])
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub query: String,
    pub result_id: String,
    pub final_score: f32,
    pub search_method: String,
    pub factors: Vec<ExplanationFactor>,
}

/// One contributing factor in an explanation
#[derive(Debug, Clone, Serialize)]
pub struct ExplanationFactor {
    pub factor: String,
    pub score: f32,
    pub weight: f32,
    pub contribution: f32,
    pub description: String,
}

/// Hybrid search manager
///
/// One instance owns its config, stats and cache; there is no process-wide
/// state. Concurrent callers are safe: config, stats and cache each sit
/// behind a mutex and the store handle is shared with the ingesting side
/// through an `RwLock`.
pub struct HybridSearchManager {
    store: Arc<RwLock<KnowledgeStore>>,
    semantic: Option<Arc<dyn SemanticScorer>>,
    config: Mutex<SearchConfig>,
    stats: Mutex<SearchStats>,
    cache: Mutex<SearchCache>,
    initialized: AtomicBool,
}

impl HybridSearchManager {
    pub fn new(
        store: Arc<RwLock<KnowledgeStore>>,
        semantic: Option<Arc<dyn SemanticScorer>>,
    ) -> Self {
        Self::with_options(store, semantic, SearchOptions::default())
    }

    /// Create a manager with initial overrides applied to the default config
    pub fn with_options(
        store: Arc<RwLock<KnowledgeStore>>,
        semantic: Option<Arc<dyn SemanticScorer>>,
        options: SearchOptions,
    ) -> Self {
        let mut config = SearchConfig::default();
        options.apply(&mut config);
        let cache = SearchCache::new(config.cache_ttl_seconds);
        Self {
            store,
            semantic,
            config: Mutex::new(config),
            stats: Mutex::new(SearchStats::default()),
            cache: Mutex::new(cache),
            initialized: AtomicBool::new(false),
        }
    }

    /// Prepare the manager for searching; idempotent and auto-run by the
    /// first search call
    pub fn initialize(&self) -> bool {
        let config = lock(&self.config);
        let total = config.keyword_weight + config.semantic_weight;
        if (total - 1.0).abs() > 0.01 {
            tracing::warn!(
                total_weight = total,
                "search weights do not sum to 1.0; hybrid scores are rescaled uniformly"
            );
        }
        drop(config);
        self.initialized.store(true, Ordering::SeqCst);
        true
    }

    /// Merge configuration overrides into the live config
    ///
    /// The cache is cleared since entries ranked under the old config would
    /// otherwise be served verbatim.
    pub fn configure(&self, options: SearchOptions) {
        let mut config = lock(&self.config);
        options.apply(&mut config);
        let ttl = config.cache_ttl_seconds;
        drop(config);

        let mut cache = lock(&self.cache);
        cache.set_ttl(ttl);
        cache.clear();
    }

    pub fn config(&self) -> SearchConfig {
        lock(&self.config).clone()
    }

    pub fn get_stats(&self) -> SearchStats {
        lock(&self.stats).clone()
    }

    pub fn clear_cache(&self) {
        lock(&self.cache).clear();
    }

    /// Release the cache and mark the manager uninitialized; idempotent
    pub fn cleanup(&self) {
        lock(&self.cache).clear();
        self.initialized.store(false, Ordering::SeqCst);
    }

    /// Recommend weights from historical feedback; the result is returned
    /// rather than applied. Pass it to [`configure`](Self::configure) to
    /// adopt it.
    pub fn optimize_weights(&self, feedback: &[SearchFeedback]) -> WeightRecommendation {
        let config = self.config();
        optimize_weights(feedback, (config.keyword_weight, config.semantic_weight))
    }

    /// Run a search
    ///
    /// `search_type` is the caller-facing mode tag (`keyword`, `semantic` or
    /// `hybrid`). Unknown tags and blank queries return an empty list and
    /// count as failed searches; they never raise.
    pub fn search(&self, query: &str, search_type: &str, filters: &SearchFilters) -> Vec<SearchResult> {
        if !self.initialized.load(Ordering::SeqCst) {
            self.initialize();
        }
        let started = Instant::now();

        let Some(mode) = SearchType::parse(search_type) else {
            tracing::warn!(search_type, "unknown search type");
            self.record_failure(started);
            return Vec::new();
        };

        // normalized form feeds the cache key only; scorers case-fold on
        // their own
        let normalized = query.trim().to_lowercase();
        if normalized.is_empty() {
            self.record_failure(started);
            return Vec::new();
        }

        let config = self.config();
        let cache_key = SearchCache::key(&normalized, mode.as_str(), filters);
        if config.cache_enabled {
            if let Some(hit) = lock(&self.cache).get(&cache_key) {
                tracing::debug!(query = %normalized, "search cache hit");
                self.record_search(mode, started, true);
                return hit;
            }
        }

        let results = self.execute(query.trim(), mode, filters, &config);

        if config.cache_enabled {
            lock(&self.cache).set(cache_key, results.clone());
        }
        self.record_search(mode, started, false);
        results
    }

    /// Explain the contributing score factors for one result
    ///
    /// Recomputes keyword and semantic components against the current store
    /// and config without touching the cache or the statistics.
    pub fn explain(&self, query: &str, result: &SearchResult) -> Explanation {
        let config = self.config();
        let mut factors = Vec::new();

        let store = read(&self.store);
        if let Some(record) = store.get(&result.content_id) {
            let kw = keyword_score(query, &record.metadata.title, &record.content);
            factors.push(ExplanationFactor {
                factor: "keyword_matching".to_string(),
                score: kw,
                weight: config.keyword_weight,
                contribution: kw * config.keyword_weight,
                description: format!("Keyword matching contributed {:.3} raw points", kw),
            });

            if let Some(provider) = &self.semantic {
                if provider.is_available() {
                    if let Ok(sem) = provider.similarity(query, &record.content) {
                        let sem = sem.clamp(0.0, 1.0);
                        factors.push(ExplanationFactor {
                            factor: "semantic_similarity".to_string(),
                            score: sem,
                            weight: config.semantic_weight,
                            contribution: sem * config.semantic_weight,
                            description: format!(
                                "Semantic similarity contributed {:.3} points",
                                sem
                            ),
                        });
                    }
                }
            }

            if config.boost_high_quality {
                if let Some(quality) = record.metadata.quality_score {
                    let boost = 1.0 + quality * QUALITY_BOOST_FACTOR;
                    factors.push(ExplanationFactor {
                        factor: "quality_boost".to_string(),
                        score: quality,
                        weight: boost,
                        contribution: boost,
                        description: format!(
                            "Quality score {:.2} multiplies the final score by {:.2}",
                            quality, boost
                        ),
                    });
                }
            }
        }

        let search_method = result
            .metadata
            .get("search_method")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string();

        Explanation {
            query: query.to_string(),
            result_id: result.content_id.clone(),
            final_score: result.score,
            search_method,
            factors,
        }
    }

    fn execute(
        &self,
        query: &str,
        mode: SearchType,
        filters: &SearchFilters,
        config: &SearchConfig,
    ) -> Vec<SearchResult> {
        let wants_keyword = matches!(mode, SearchType::Keyword | SearchType::Hybrid);
        let wants_semantic = matches!(mode, SearchType::Semantic | SearchType::Hybrid);

        let semantic_active =
            wants_semantic && matches!(&self.semantic, Some(p) if p.is_available());
        if mode == SearchType::Semantic && !semantic_active {
            tracing::debug!("semantic provider unavailable, returning empty result set");
            return Vec::new();
        }

        let store = read(&self.store);

        // score every record first; the keyword normalization max must be
        // taken over the whole batch, before filters drop anything
        let mut candidates = Vec::new();
        for (id, record) in store.records() {
            let kw = if wants_keyword {
                keyword_score(query, &record.metadata.title, &record.content)
            } else {
                0.0
            };
            let sem = if semantic_active {
                // recoverable per record: a provider error degrades this
                // record's semantic contribution to zero
                match self.semantic.as_ref().map(|p| p.similarity(query, &record.content)) {
                    Some(Ok(s)) => s.clamp(0.0, 1.0),
                    Some(Err(e)) => {
                        tracing::warn!(id, error = %e, "semantic scoring failed for record");
                        0.0
                    }
                    None => 0.0,
                }
            } else {
                0.0
            };

            let include = match mode {
                SearchType::Keyword => kw > 0.0,
                SearchType::Semantic => true,
                SearchType::Hybrid => kw > 0.0 || sem > 0.0,
            };
            if include {
                candidates.push((id, record, kw, sem));
            }
        }

        let max_keyword = candidates.iter().map(|c| c.2).fold(0.0f32, f32::max);
        let timestamp = Utc::now().to_rfc3339();

        let mut results = Vec::new();
        for (id, record, kw, sem) in candidates {
            let (mut score, method) = match mode {
                SearchType::Keyword => (kw, "keyword"),
                SearchType::Semantic => (sem, "semantic"),
                SearchType::Hybrid => {
                    let kw_norm = if max_keyword > 0.0 { kw / max_keyword } else { 0.0 };
                    let score = config.keyword_weight * kw_norm + config.semantic_weight * sem;
                    let method = if kw > 0.0 && sem > 0.0 {
                        "hybrid"
                    } else if kw > 0.0 {
                        "keyword"
                    } else {
                        "semantic"
                    };
                    (score, method)
                }
            };

            if !filters.matches(record) {
                continue;
            }

            if config.boost_high_quality {
                if let Some(quality) = record.metadata.quality_score {
                    score *= 1.0 + quality * QUALITY_BOOST_FACTOR;
                }
            }

            if score < config.min_score_threshold {
                continue;
            }

            let mut metadata = match serde_json::to_value(&record.metadata) {
                Ok(Value::Object(map)) => map,
                _ => serde_json::Map::new(),
            };
            if wants_keyword {
                metadata.insert("keyword_score".to_string(), json!(kw));
            }
            if semantic_active {
                metadata.insert("semantic_score".to_string(), json!(sem));
            }
            metadata.insert("search_method".to_string(), json!(method));
            metadata.insert("search_query".to_string(), json!(query));
            metadata.insert("search_type".to_string(), json!(mode.as_str()));
            metadata.insert("search_timestamp".to_string(), json!(timestamp));

            results.push(SearchResult {
                content_id: id.to_string(),
                snippet: record.snippet(SNIPPET_CHARS),
                score,
                source_type: record.metadata.source_type,
                metadata,
            });
        }

        // stable sort keeps store iteration order for equal scores
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(config.max_results);
        results
    }

    fn record_search(&self, mode: SearchType, started: Instant, cache_hit: bool) {
        let mut stats = lock(&self.stats);
        stats.total_searches += 1;
        match mode {
            SearchType::Keyword => stats.keyword_searches += 1,
            SearchType::Semantic => stats.semantic_searches += 1,
            SearchType::Hybrid => stats.hybrid_searches += 1,
        }
        if cache_hit {
            stats.cache_hits += 1;
        }
        Self::update_average(&mut stats, started);
    }

    fn record_failure(&self, started: Instant) {
        let mut stats = lock(&self.stats);
        stats.total_searches += 1;
        stats.failed_searches += 1;
        Self::update_average(&mut stats, started);
    }

    fn update_average(stats: &mut SearchStats, started: Instant) {
        let elapsed = started.elapsed().as_secs_f64();
        let n = stats.total_searches as f64;
        stats.average_response_time = (stats.average_response_time * (n - 1.0) + elapsed) / n;
    }
}

/// Lock a mutex, recovering the data from a poisoned lock; search must stay
/// fail-soft even after a panic in another caller
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn read<T>(rwlock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    rwlock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SemanticError;
    use crate::store::{ContentMetadata, SourceType};
    use tempfile::TempDir;

    struct StubScorer {
        available: bool,
    }

    impl SemanticScorer for StubScorer {
        fn is_available(&self) -> bool {
            self.available
        }

        fn similarity(&self, query: &str, text: &str) -> Result<f32, SemanticError> {
            // crude token overlap, good enough to drive ranking in tests
            let hits = query
                .to_lowercase()
                .split_whitespace()
                .filter(|t| text.to_lowercase().contains(*t))
                .count();
            Ok((hits as f32 / 4.0).min(1.0))
        }
    }

    fn seeded_manager(semantic: Option<Arc<dyn SemanticScorer>>) -> (TempDir, HybridSearchManager) {
        let dir = TempDir::new().unwrap();
        let mut store = KnowledgeStore::open(dir.path().join("kb.json"));
        store.add_content(
            "Machine learning is a subset of artificial intelligence that focuses on algorithms.",
            ContentMetadata::new("Machine Learning Basics").with_quality(0.9),
            SourceType::Article,
        );
        store.add_content(
            "Deep learning uses neural networks with many layers.",
            ContentMetadata::new("Deep Learning Introduction").with_quality(0.8),
            SourceType::Video,
        );
        store.add_content(
            "AI systems must be developed responsibly with ethical considerations.",
            ContentMetadata::new("AI Ethics and Responsibility").with_quality(0.7),
            SourceType::Pdf,
        );
        let manager = HybridSearchManager::new(Arc::new(RwLock::new(store)), semantic);
        (dir, manager)
    }

    #[test]
    fn test_keyword_search_finds_matching_record() {
        let (_dir, manager) = seeded_manager(None);
        let results = manager.search("machine learning", "keyword", &SearchFilters::default());

        assert!(!results.is_empty());
        let top = &results[0];
        assert_eq!(
            top.metadata.get("title").unwrap().as_str().unwrap(),
            "Machine Learning Basics"
        );
    }

    #[test]
    fn test_keyword_search_excludes_nonmatching_records() {
        let (_dir, manager) = seeded_manager(None);
        let results = manager.search("responsibly", "keyword", &SearchFilters::default());

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source_type, SourceType::Pdf);
    }

    #[test]
    fn test_invalid_search_type_fails_soft() {
        let (_dir, manager) = seeded_manager(None);
        let results = manager.search("machine", "invalid_type", &SearchFilters::default());

        assert!(results.is_empty());
        let stats = manager.get_stats();
        assert_eq!(stats.failed_searches, 1);
        assert_eq!(stats.total_searches, 1);
    }

    #[test]
    fn test_blank_query_fails_soft() {
        let (_dir, manager) = seeded_manager(None);
        assert!(manager.search("", "hybrid", &SearchFilters::default()).is_empty());
        assert!(manager.search("   ", "keyword", &SearchFilters::default()).is_empty());
        assert_eq!(manager.get_stats().failed_searches, 2);
    }

    #[test]
    fn test_semantic_unavailable_returns_empty() {
        let (_dir, manager) =
            seeded_manager(Some(Arc::new(StubScorer { available: false }) as Arc<dyn SemanticScorer>));
        let results = manager.search("machine learning", "semantic", &SearchFilters::default());

        assert!(results.is_empty());
        let stats = manager.get_stats();
        assert_eq!(stats.semantic_searches, 1);
        assert_eq!(stats.failed_searches, 0);
    }

    #[test]
    fn test_hybrid_degrades_to_keyword_ranking_when_semantic_unavailable() {
        let (_dir, manager) =
            seeded_manager(Some(Arc::new(StubScorer { available: false }) as Arc<dyn SemanticScorer>));

        let hybrid = manager.search("machine learning", "hybrid", &SearchFilters::default());
        let keyword = manager.search("machine learning", "keyword", &SearchFilters::default());

        let hybrid_ids: Vec<_> = hybrid.iter().map(|r| r.content_id.clone()).collect();
        let keyword_ids: Vec<_> = keyword.iter().map(|r| r.content_id.clone()).collect();
        assert_eq!(hybrid_ids, keyword_ids);
    }

    #[test]
    fn test_hybrid_combines_both_scores() {
        let (_dir, manager) =
            seeded_manager(Some(Arc::new(StubScorer { available: true }) as Arc<dyn SemanticScorer>));
        let results = manager.search("machine learning", "hybrid", &SearchFilters::default());

        assert!(!results.is_empty());
        let top = &results[0];
        assert!(top.metadata.contains_key("keyword_score"));
        assert!(top.metadata.contains_key("semantic_score"));
        assert_eq!(top.metadata.get("search_method").unwrap(), "hybrid");
    }

    #[test]
    fn test_max_results_truncation() {
        let (_dir, manager) = seeded_manager(None);
        manager.configure(SearchOptions {
            max_results: Some(1),
            min_score_threshold: Some(0.0),
            ..Default::default()
        });

        let results = manager.search("learning", "keyword", &SearchFilters::default());
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_min_score_threshold_applied() {
        let (_dir, manager) = seeded_manager(None);
        manager.configure(SearchOptions {
            min_score_threshold: Some(1000.0),
            ..Default::default()
        });

        let results = manager.search("machine learning", "keyword", &SearchFilters::default());
        assert!(results.is_empty());
    }

    #[test]
    fn test_source_type_filter() {
        let (_dir, manager) = seeded_manager(None);
        let filters = SearchFilters {
            min_quality_score: None,
            source_type: Some(SourceType::Video),
        };
        let results = manager.search("learning", "keyword", &filters);

        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.source_type == SourceType::Video));
    }

    #[test]
    fn test_cache_hit_counted_and_identical() {
        let (_dir, manager) = seeded_manager(None);
        let first = manager.search("machine learning", "keyword", &SearchFilters::default());
        let second = manager.search("machine learning", "keyword", &SearchFilters::default());

        let first_ids: Vec<_> = first.iter().map(|r| r.content_id.clone()).collect();
        let second_ids: Vec<_> = second.iter().map(|r| r.content_id.clone()).collect();
        assert_eq!(first_ids, second_ids);

        let stats = manager.get_stats();
        assert_eq!(stats.total_searches, 2);
        assert_eq!(stats.cache_hits, 1);
    }

    #[test]
    fn test_cache_disabled_bypasses_cache() {
        let (_dir, manager) = seeded_manager(None);
        manager.configure(SearchOptions {
            cache_enabled: Some(false),
            ..Default::default()
        });

        manager.search("machine learning", "keyword", &SearchFilters::default());
        manager.search("machine learning", "keyword", &SearchFilters::default());
        assert_eq!(manager.get_stats().cache_hits, 0);
    }

    #[test]
    fn test_configure_clears_cache() {
        let (_dir, manager) = seeded_manager(None);
        manager.search("machine learning", "keyword", &SearchFilters::default());
        manager.configure(SearchOptions {
            keyword_weight: Some(0.5),
            ..Default::default()
        });
        manager.search("machine learning", "keyword", &SearchFilters::default());

        // second call recomputed under the new config
        assert_eq!(manager.get_stats().cache_hits, 0);
        assert_eq!(manager.config().keyword_weight, 0.5);
    }

    #[test]
    fn test_configure_accepts_extreme_ttl() {
        let (_dir, manager) = seeded_manager(None);

        // config values are accepted as given, so a pathological TTL must
        // not take down the search path
        manager.configure(SearchOptions {
            cache_ttl_seconds: Some(f64::INFINITY),
            ..Default::default()
        });
        assert!(!manager.search("machine learning", "keyword", &SearchFilters::default()).is_empty());

        manager.configure(SearchOptions {
            cache_ttl_seconds: Some(f64::NAN),
            ..Default::default()
        });
        assert!(!manager.search("machine learning", "keyword", &SearchFilters::default()).is_empty());
    }

    #[test]
    fn test_annotations_present() {
        let (_dir, manager) = seeded_manager(None);
        let results = manager.search("machine learning", "keyword", &SearchFilters::default());

        let top = &results[0];
        assert_eq!(top.metadata.get("search_query").unwrap(), "machine learning");
        assert_eq!(top.metadata.get("search_type").unwrap(), "keyword");
        assert!(top.metadata.contains_key("search_timestamp"));
    }

    #[test]
    fn test_explain_reports_factors_without_touching_stats() {
        let (_dir, manager) =
            seeded_manager(Some(Arc::new(StubScorer { available: true }) as Arc<dyn SemanticScorer>));
        let results = manager.search("machine learning", "hybrid", &SearchFilters::default());
        let before = manager.get_stats();

        let explanation = manager.explain("machine learning", &results[0]);
        assert_eq!(explanation.result_id, results[0].content_id);
        assert_eq!(explanation.search_method, "hybrid");
        let factor_names: Vec<_> = explanation.factors.iter().map(|f| f.factor.as_str()).collect();
        assert!(factor_names.contains(&"keyword_matching"));
        assert!(factor_names.contains(&"semantic_similarity"));
        assert!(factor_names.contains(&"quality_boost"));

        let after = manager.get_stats();
        assert_eq!(before.total_searches, after.total_searches);
        assert_eq!(before.cache_hits, after.cache_hits);
    }

    #[test]
    fn test_cleanup_and_reinitialize() {
        let (_dir, manager) = seeded_manager(None);
        manager.search("machine learning", "keyword", &SearchFilters::default());

        manager.cleanup();
        manager.cleanup(); // idempotent

        // searching after cleanup auto-initializes and recomputes
        let results = manager.search("machine learning", "keyword", &SearchFilters::default());
        assert!(!results.is_empty());
        assert_eq!(manager.get_stats().cache_hits, 0);
    }

    #[test]
    fn test_quality_boost_changes_score() {
        let (_dir, manager) = seeded_manager(None);
        manager.configure(SearchOptions {
            boost_high_quality: Some(false),
            cache_enabled: Some(false),
            ..Default::default()
        });
        let plain = manager.search("machine learning", "keyword", &SearchFilters::default());

        manager.configure(SearchOptions {
            boost_high_quality: Some(true),
            cache_enabled: Some(false),
            ..Default::default()
        });
        let boosted = manager.search("machine learning", "keyword", &SearchFilters::default());

        // seeded record has quality 0.9, so the boost is 1.09x
        assert!((boosted[0].score - plain[0].score * 1.09).abs() < 1e-4);
    }
}
