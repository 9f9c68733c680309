//! Change events and forward payloads
//!
//! A change event is delivered once per document mutation. Documents are
//! schemaless, so both the document and the metadata are kept as JSON maps
//! and every field passes through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Key under which the metadata identifier is written into the payload
pub const ID_FIELD: &str = "id";

/// Marker field whose presence means the document was already enriched
pub const DEFAULT_MARKER_FIELD: &str = "embedding";

/// Schemaless document body
pub type Document = Map<String, Value>;

/// Metadata delivered alongside a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Document identifier
    pub id: String,

    /// Any further metadata fields (cas, expiration, ...), ignored here
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single document mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub document: Document,
    pub metadata: EventMetadata,
}

impl ChangeEvent {
    pub fn new(document: Document, id: impl Into<String>) -> Self {
        Self {
            document,
            metadata: EventMetadata {
                id: id.into(),
                extra: Map::new(),
            },
        }
    }

    /// Document identifier from the metadata
    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    /// True if the document carries `marker` (any value, `null` included)
    pub fn has_marker(&self, marker: &str) -> bool {
        self.document.contains_key(marker)
    }
}

/// Which side wins when the document itself has an `id` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdPrecedence {
    /// `{...doc, id: meta.id}`: the metadata identifier overrides
    #[default]
    Metadata,
    /// `{id: meta.id, ...doc}`: a document `id` field overrides
    Document,
}

impl IdPrecedence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metadata => "metadata",
            Self::Document => "document",
        }
    }
}

impl fmt::Display for IdPrecedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdPrecedence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metadata" | "meta" => Ok(Self::Metadata),
            "document" | "doc" => Ok(Self::Document),
            other => Err(format!("expected 'metadata' or 'document', got '{other}'")),
        }
    }
}

/// JSON object sent to the API endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ForwardPayload(Map<String, Value>);

impl ForwardPayload {
    /// Shallow-merge the document with the metadata identifier
    pub fn build(event: &ChangeEvent, precedence: IdPrecedence) -> Self {
        let id = Value::String(event.metadata.id.clone());

        let fields = match precedence {
            IdPrecedence::Metadata => {
                let mut fields = event.document.clone();
                fields.insert(ID_FIELD.to_string(), id);
                fields
            }
            IdPrecedence::Document => {
                let mut fields = Map::with_capacity(event.document.len() + 1);
                fields.insert(ID_FIELD.to_string(), id);
                fields.extend(event.document.clone());
                fields
            }
        };

        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_json_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.0)
    }
}
