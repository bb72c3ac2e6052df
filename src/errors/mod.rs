use thiserror::Error;

/// Errors surfaced by the document and file store facades.
///
/// Driver failures pass through unmodified; this crate adds no
/// classification or recovery of its own.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid filename pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Model already registered: {name}")]
    DuplicateModel { name: String },

    #[error("Model not registered: {name}")]
    ModelNotRegistered { name: String },

    #[error("Connection string names no database and MONGODB_DATABASE is not set")]
    NoDatabase,

    #[error("Invalid object id: {0}")]
    InvalidObjectId(String),
}

impl StoreError {
    pub fn duplicate_model<S: Into<String>>(name: S) -> Self {
        Self::DuplicateModel { name: name.into() }
    }

    pub fn model_not_registered<S: Into<String>>(name: S) -> Self {
        Self::ModelNotRegistered { name: name.into() }
    }

    pub fn invalid_object_id<S: Into<String>>(id: S) -> Self {
        Self::InvalidObjectId(id.into())
    }
}
