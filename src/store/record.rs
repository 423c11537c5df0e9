//! Content records and their metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// Where a piece of content came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Video transcript
    Video,
    /// Scraped web article
    Article,
    /// Extracted PDF document
    Pdf,
    /// Plain text
    Text,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Video => "video",
            SourceType::Article => "article",
            SourceType::Pdf => "pdf",
            SourceType::Text => "text",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata attached to a content record
///
/// Known keys are typed; anything else the ingesting collaborator supplies
/// (uploader, author, source URL, ...) is kept in `extra` and round-trips
/// through the persisted JSON unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentMetadata {
    #[serde(default)]
    pub title: String,

    #[serde(default = "default_source_type")]
    pub source_type: SourceType,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Content quality in [0, 1], when the ingesting side scored it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

fn default_source_type() -> SourceType {
    SourceType::Text
}

impl ContentMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source_type: SourceType::Text,
            tags: BTreeSet::new(),
            quality_score: None,
            date_added: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_quality(mut self, quality_score: f32) -> Self {
        self.quality_score = Some(quality_score);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// One ingested unit of knowledge
///
/// Immutable once added, apart from explicit metadata updates through the
/// store. The persisted JSON shape (`metadata` / `content` /
/// `processing_notes`) is the durable format existing corpora use and must
/// not change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecord {
    pub metadata: ContentMetadata,
    pub content: String,
    #[serde(default)]
    pub processing_notes: Vec<String>,
}

impl ContentRecord {
    /// Get a short preview of the content (first `max_chars` characters)
    pub fn snippet(&self, max_chars: usize) -> String {
        if self.content.chars().count() <= max_chars {
            self.content.clone()
        } else {
            let cut: String = self.content.chars().take(max_chars).collect();
            format!("{}...", cut)
        }
    }
}
