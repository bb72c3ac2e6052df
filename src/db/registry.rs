use std::collections::HashMap;

use crate::errors::StoreError;
use crate::models::ModelSpec;

/// Name-to-spec map populated through `DocumentStore::register_models`.
///
/// Registration goes through `&mut self`, so writers are serialized by the
/// borrow checker; lookups after setup are read-only.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    specs: HashMap<String, ModelSpec>,
}

impl ModelRegistry {
    pub fn register(&mut self, spec: ModelSpec) -> Result<(), StoreError> {
        if self.specs.contains_key(spec.name()) {
            return Err(StoreError::duplicate_model(spec.name()));
        }
        self.specs.insert(spec.name().to_string(), spec);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&ModelSpec, StoreError> {
        self.specs
            .get(name)
            .ok_or_else(|| StoreError::model_not_registered(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.specs.keys().map(String::as_str).collect()
    }
}
