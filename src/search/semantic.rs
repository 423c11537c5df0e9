//! Semantic scoring seam
//!
//! The embedding/similarity backend is an external collaborator; this module
//! only defines the contract the search manager consumes. Providers may come
//! and go at runtime, so availability is checked per call and every failure
//! degrades to a zero contribution instead of failing the search.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SemanticError {
    #[error("Semantic provider unavailable")]
    Unavailable,

    #[error("Similarity computation failed: {0}")]
    Provider(String),
}

/// Contract for semantic similarity providers
///
/// Implementations are expected to bound their own latency; a provider that
/// times out should report the failure (or flip `is_available`) rather than
/// block the search call.
pub trait SemanticScorer: Send + Sync {
    /// Whether the provider can currently serve similarity requests
    fn is_available(&self) -> bool;

    /// Similarity between a query and a record's text, in [0, 1]
    fn similarity(&self, query: &str, text: &str) -> Result<f32, SemanticError>;
}
