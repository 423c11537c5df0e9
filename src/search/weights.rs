//! Weight optimization from relevance feedback
//!
//! Derives new keyword/semantic weights proportional to the mean satisfaction
//! observed per search method. The recommendation is never applied
//! automatically; callers pass it to `configure` when they agree with it.

use crate::search::SearchType;
use serde::{Deserialize, Serialize};

/// One historical feedback sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchFeedback {
    /// Which search method produced the result the user rated
    pub search_method: SearchType,

    /// User satisfaction in [0, 1]
    pub satisfaction_score: f32,
}

/// Recommended weights, normalized to sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightRecommendation {
    pub keyword_weight: f32,
    pub semantic_weight: f32,
}

/// Derive weights from feedback, falling back to `current` when the samples
/// carry no signal
///
/// Hybrid samples rate the blend rather than either component, so they do not
/// move the recommendation. A method with no samples is assumed neutral (0.5).
pub fn optimize_weights(
    feedback: &[SearchFeedback],
    current: (f32, f32),
) -> WeightRecommendation {
    if feedback.is_empty() {
        return WeightRecommendation {
            keyword_weight: current.0,
            semantic_weight: current.1,
        };
    }

    let (mut keyword_sum, mut keyword_n) = (0.0f32, 0usize);
    let (mut semantic_sum, mut semantic_n) = (0.0f32, 0usize);
    for sample in feedback {
        match sample.search_method {
            SearchType::Keyword => {
                keyword_sum += sample.satisfaction_score;
                keyword_n += 1;
            }
            SearchType::Semantic => {
                semantic_sum += sample.satisfaction_score;
                semantic_n += 1;
            }
            SearchType::Hybrid => {}
        }
    }

    let avg_keyword = if keyword_n > 0 {
        keyword_sum / keyword_n as f32
    } else {
        0.5
    };
    let avg_semantic = if semantic_n > 0 {
        semantic_sum / semantic_n as f32
    } else {
        0.5
    };

    let total = avg_keyword + avg_semantic;
    if total <= f32::EPSILON {
        return WeightRecommendation {
            keyword_weight: current.0,
            semantic_weight: current.1,
        };
    }

    WeightRecommendation {
        keyword_weight: avg_keyword / total,
        semantic_weight: avg_semantic / total,
    }
}
