use mongodb::bson::doc;

use crate::db::ModelRegistry;
use crate::errors::StoreError;
use crate::models::{IndexSpec, ModelSpec};

#[test]
fn register_and_get_round_trip() {
    let mut registry = ModelRegistry::default();
    registry
        .register(ModelSpec::new("user").collection("users").timestamps(true))
        .unwrap();

    let spec = registry.get("user").unwrap();
    assert_eq!(spec.name(), "user");
    assert_eq!(spec.collection_name(), "users");
    assert!(spec.timestamps_enabled());
    assert!(registry.contains("user"));
}

#[test]
fn duplicate_registration_is_an_error() {
    let mut registry = ModelRegistry::default();
    registry.register(ModelSpec::new("user")).unwrap();

    let err = registry.register(ModelSpec::new("user")).unwrap_err();
    match err {
        StoreError::DuplicateModel { name } => assert_eq!(name, "user"),
        other => panic!("unexpected error: {other:?}"),
    }

    // The original registration is untouched.
    assert!(registry.get("user").is_ok());
}

#[test]
fn lookup_of_unregistered_name_is_an_error() {
    let registry = ModelRegistry::default();
    let err = registry.get("ghost").unwrap_err();
    match err {
        StoreError::ModelNotRegistered { name } => assert_eq!(name, "ghost"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn spec_defaults() {
    let spec = ModelSpec::new("blog");
    assert_eq!(spec.collection_name(), "blog");
    assert!(!spec.timestamps_enabled());
    assert!(spec.indexes().is_empty());
}

#[test]
fn spec_carries_declared_indexes() {
    let spec = ModelSpec::new("user")
        .index(IndexSpec::new(doc! { "email": 1 }).unique().named("idx_email"))
        .index(IndexSpec::new(doc! { "name": 1 }));

    assert_eq!(spec.indexes().len(), 2);
    assert!(spec.indexes()[0].unique);
    assert_eq!(spec.indexes()[0].name.as_deref(), Some("idx_email"));
    assert!(!spec.indexes()[1].unique);

    let model = spec.indexes()[0].to_index_model();
    let options = model.options.unwrap();
    assert_eq!(options.unique, Some(true));
    assert_eq!(options.name.as_deref(), Some("idx_email"));
}
