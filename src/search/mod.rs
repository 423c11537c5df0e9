//! Hybrid search over the knowledge store
//!
//! Combines independent keyword and semantic scoring with configurable
//! weighting, filtering, caching and an explainability surface. The
//! embedding backend is an external collaborator behind [`SemanticScorer`].

mod cache;
mod keyword;
mod manager;
mod semantic;
mod weights;

pub use cache::SearchCache;
pub use keyword::keyword_score;
pub use manager::{
    Explanation, ExplanationFactor, HybridSearchManager, SearchConfig, SearchOptions, SearchStats,
};
pub use semantic::{SemanticError, SemanticScorer};
pub use weights::{optimize_weights, SearchFeedback, WeightRecommendation};

use crate::store::{ContentRecord, SourceType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Search mode selected per call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Keyword,
    Semantic,
    Hybrid,
}

impl SearchType {
    /// Parse a caller-supplied mode tag; unknown tags are `None` so the
    /// manager can take its fail-soft empty-result path instead of silently
    /// picking a default mode.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "keyword" => Some(SearchType::Keyword),
            "semantic" => Some(SearchType::Semantic),
            "hybrid" => Some(SearchType::Hybrid),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Keyword => "keyword",
            SearchType::Semantic => "semantic",
            SearchType::Hybrid => "hybrid",
        }
    }
}

/// Per-call record filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Drop records whose quality score is below this value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_quality_score: Option<f32>,

    /// Keep only records of this source type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,
}

impl SearchFilters {
    pub(crate) fn matches(&self, record: &ContentRecord) -> bool {
        if let Some(min_quality) = self.min_quality_score {
            // a record the ingesting side never scored cannot pass a quality bar
            let quality = record.metadata.quality_score.unwrap_or(0.0);
            if quality < min_quality {
                return false;
            }
        }
        if let Some(source_type) = self.source_type {
            if record.metadata.source_type != source_type {
                return false;
            }
        }
        true
    }

    /// Deterministic serialization for cache keys (fixed field order)
    pub(crate) fn cache_token(&self) -> String {
        format!(
            "min_quality_score={:?},source_type={:?}",
            self.min_quality_score,
            self.source_type.map(|s| s.as_str())
        )
    }
}

/// One ranked search hit
///
/// Created fresh per search call and never persisted. `metadata` carries the
/// record's metadata plus search-time annotations (query, mode, timestamp and
/// the per-factor score breakdown).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub content_id: String,
    pub snippet: String,
    pub score: f32,
    pub source_type: SourceType,
    pub metadata: serde_json::Map<String, Value>,
}
