//! Knowledge store
//!
//! Flat JSON-backed mapping from content id to record. Every mutation is
//! written through to disk; the in-memory map stays authoritative for the
//! session when a save fails.

mod record;

use crate::error::{AdvisorError, Result};
use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub use record::{ContentMetadata, ContentRecord, SourceType};

/// Deterministic content id from body text and title (truncated BLAKE3 hex)
pub fn content_id(content: &str, title: &str) -> String {
    let hash = blake3::hash(format!("{}{}", content, title).as_bytes());
    format!("{:.16}", hash.to_hex())
}

/// Knowledge store holding content records keyed by content id
///
/// Records are kept in a `BTreeMap` so iteration order is deterministic,
/// which keeps search tie-breaking reproducible.
pub struct KnowledgeStore {
    records: BTreeMap<String, ContentRecord>,
    path: PathBuf,
}

impl KnowledgeStore {
    /// Open a store backed by the given JSON file
    ///
    /// A missing file is an empty store. A file that cannot be read or
    /// parsed is logged and treated as empty rather than failing the caller.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match Self::load(&path) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to load knowledge base, starting empty");
                BTreeMap::new()
            }
        };
        Self { records, path }
    }

    fn load(path: &Path) -> Result<BTreeMap<String, ContentRecord>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(path).map_err(|e| AdvisorError::Io {
            source: e,
            context: format!("Failed to read knowledge base: {}", path.display()),
        })?;
        serde_json::from_str(&content).map_err(|e| AdvisorError::Json {
            source: e,
            context: format!("Failed to parse knowledge base: {}", path.display()),
        })
    }

    /// Add content to the store, returning its id
    ///
    /// The id is derived from content and title, so re-adding identical
    /// content is a no-op that returns the existing id.
    pub fn add_content(
        &mut self,
        content: &str,
        mut metadata: ContentMetadata,
        source_type: SourceType,
    ) -> String {
        let id = content_id(content, &metadata.title);
        if self.records.contains_key(&id) {
            tracing::debug!(id = %id, "content already present, skipping");
            return id;
        }

        let now = Utc::now();
        metadata.source_type = source_type;
        metadata.date_added = Some(now);
        metadata.extra.insert("id".to_string(), Value::String(id.clone()));

        let record = ContentRecord {
            metadata,
            content: content.to_string(),
            processing_notes: vec![format!(
                "Added to knowledge base on {}",
                now.format("%Y-%m-%d")
            )],
        };

        self.records.insert(id.clone(), record);
        self.persist();
        tracing::info!(id = %id, source_type = %source_type, "added content record");
        id
    }

    /// Get a record by content id
    pub fn get(&self, id: &str) -> Option<&ContentRecord> {
        self.records.get(id)
    }

    /// Iterate over all records in id order
    pub fn records(&self) -> impl Iterator<Item = (&str, &ContentRecord)> {
        self.records.iter().map(|(id, record)| (id.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Update a single metadata key on an existing record
    ///
    /// Returns false when the id is unknown. Typed keys (`quality_score`,
    /// `title`) are updated in place; everything else lands in the open
    /// metadata map. The change is persisted immediately.
    pub fn update_metadata(&mut self, id: &str, key: &str, value: Value) -> bool {
        let Some(record) = self.records.get_mut(id) else {
            return false;
        };
        match key {
            "quality_score" => {
                record.metadata.quality_score = value.as_f64().map(|v| v as f32);
            }
            "title" => {
                if let Some(title) = value.as_str() {
                    record.metadata.title = title.to_string();
                }
            }
            _ => {
                record.metadata.extra.insert(key.to_string(), value);
            }
        }
        self.persist();
        true
    }

    /// Store statistics: record count, per-source breakdown, storage path
    pub fn stats(&self) -> StoreStats {
        let mut by_source: BTreeMap<String, usize> = BTreeMap::new();
        for record in self.records.values() {
            *by_source
                .entry(record.metadata.source_type.as_str().to_string())
                .or_insert(0) += 1;
        }
        StoreStats {
            total_records: self.records.len(),
            by_source,
            storage_path: self.path.clone(),
        }
    }

    /// Write the full store through to disk, swallowing failures
    ///
    /// Write goes to a temp file first and is renamed into place so readers
    /// never observe a partially written store.
    fn persist(&self) {
        if let Err(e) = self.try_persist() {
            tracing::error!(path = %self.path.display(), error = %e, "failed to persist knowledge base");
        }
    }

    fn try_persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| AdvisorError::Io {
                    source: e,
                    context: format!("Failed to create data directory: {}", parent.display()),
                })?;
            }
        }

        let json = serde_json::to_string_pretty(&self.records).map_err(|e| AdvisorError::Json {
            source: e,
            context: "Failed to serialize knowledge base".to_string(),
        })?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json).map_err(|e| AdvisorError::Io {
            source: e,
            context: format!("Failed to write knowledge base: {}", temp_path.display()),
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| AdvisorError::Io {
            source: e,
            context: format!(
                "Failed to rename temp knowledge base into place: {}",
                self.path.display()
            ),
        })?;
        Ok(())
    }
}

/// Knowledge store statistics
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub total_records: usize,
    pub by_source: BTreeMap<String, usize>,
    pub storage_path: PathBuf,
}
