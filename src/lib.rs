//! advisor-kb - JSON-backed knowledge store with hybrid search
//!
//! Aggregates content records (video transcripts, scraped articles, documents)
//! into a flat JSON knowledge base and serves hybrid keyword + semantic
//! ranking over it for a conversational advisor. Ingestion glue (scrapers,
//! PDF extraction, auth) and the embedding backend are external collaborators:
//! they supply content through [`store::KnowledgeStore::add_content`] and
//! similarity scores through [`search::SemanticScorer`].

pub mod config;
pub mod error;
pub mod search;
pub mod store;

pub use error::{AdvisorError, Result};
