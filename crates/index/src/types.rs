//! Index type definitions.

use serde::{Deserialize, Serialize};

/// Free-form key/value metadata attached to a document.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Metadata stored for one indexed vector, at the same position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Caller-supplied document identifier (not required to be unique)
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// Source path or URL
    #[serde(default)]
    pub path: Option<String>,

    /// Arbitrary metadata
    #[serde(default)]
    pub meta: Option<Metadata>,
}

impl DocumentRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            path: None,
            meta: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_meta(mut self, meta: Metadata) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,

    /// Cosine similarity in [-1, 1]
    pub score: f32,

    pub name: Option<String>,
    pub path: Option<String>,
    pub meta: Option<Metadata>,
}

impl SearchHit {
    pub(crate) fn from_record(record: &DocumentRecord, score: f32) -> Self {
        Self {
            id: record.id.clone(),
            score,
            name: record.name.clone(),
            path: record.path.clone(),
            meta: record.meta.clone(),
        }
    }
}

/// Snapshot of index size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of stored vectors (always equal to the record count)
    pub documents: usize,

    /// Established vector dimension, `None` until the first insert
    pub dimension: Option<usize>,
}
