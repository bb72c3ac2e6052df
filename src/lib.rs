pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod services;

#[cfg(test)]
mod tests;

pub use mongodb;
pub use mongodb::bson;

pub use config::Config;
pub use db::{DocumentStore, Model, ModelRegistry};
pub use errors::StoreError;
pub use models::{parse_object_id, Draft, FileRecord, IndexSpec, ModelSpec, Stored, UploadOptions};
pub use services::FileStore;
