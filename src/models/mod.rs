use mongodb::bson::oid::ObjectId;
use mongodb::bson::{DateTime, Document};
use mongodb::options::IndexOptions;
use mongodb::IndexModel;
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

/// Metadata record for a blob stored in a GridFS bucket.
pub use mongodb::gridfs::FilesCollectionDocument as FileRecord;

/// Schema definition for a named model: which collection it maps to,
/// whether saves stamp timestamps, and which indexes it declares.
#[derive(Debug, Clone)]
pub struct ModelSpec {
    name: String,
    collection: Option<String>,
    timestamps: bool,
    indexes: Vec<IndexSpec>,
}

impl ModelSpec {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            collection: None,
            timestamps: false,
            indexes: Vec::new(),
        }
    }

    /// Target collection name; defaults to the model name.
    pub fn collection<S: Into<String>>(mut self, collection: S) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Stamp `created_at`/`updated_at` on save and bump `updated_at` on update.
    pub fn timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    pub fn index(mut self, index: IndexSpec) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn collection_name(&self) -> &str {
        self.collection.as_deref().unwrap_or(&self.name)
    }

    pub fn timestamps_enabled(&self) -> bool {
        self.timestamps
    }

    pub fn indexes(&self) -> &[IndexSpec] {
        &self.indexes
    }
}

/// A single index declared on a model spec.
#[derive(Debug, Clone)]
pub struct IndexSpec {
    pub keys: Document,
    pub unique: bool,
    pub name: Option<String>,
}

impl IndexSpec {
    pub fn new(keys: Document) -> Self {
        Self {
            keys,
            unique: false,
            name: None,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn named<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn to_index_model(&self) -> IndexModel {
        let options = IndexOptions::builder()
            .unique(self.unique)
            .name(self.name.clone())
            .build();
        IndexModel::builder()
            .keys(self.keys.clone())
            .options(options)
            .build()
    }
}

/// An unsaved document: a pre-assigned id plus the entity body.
#[derive(Debug, Clone)]
pub struct Draft<T> {
    pub id: ObjectId,
    pub body: T,
}

impl<T> Draft<T> {
    pub fn new(body: T) -> Self {
        Self {
            id: ObjectId::new(),
            body,
        }
    }
}

/// A persisted document: the entity body flattened alongside the envelope
/// fields maintained by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stored<T> {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,

    #[serde(rename = "_revision", default)]
    pub revision: i64,

    #[serde(flatten)]
    pub body: T,
}

impl<T> Stored<T> {
    /// Stamp a draft for persistence. Timestamps are only set when the
    /// owning model spec asks for them.
    pub(crate) fn from_draft(draft: Draft<T>, timestamps: bool) -> Self {
        let now = timestamps.then(DateTime::now);
        Self {
            id: draft.id,
            created_at: now,
            updated_at: now,
            revision: 0,
            body: draft.body,
        }
    }
}

/// Caller-supplied options for a single upload.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    pub metadata: Option<Document>,
    pub chunk_size_bytes: Option<u32>,
}

/// Parses a 24-character hex string into an [`ObjectId`].
pub fn parse_object_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::invalid_object_id(id))
}
