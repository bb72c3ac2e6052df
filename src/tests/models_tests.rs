use mongodb::bson::{self, doc};
use mongodb::options::UpdateModifications;
use serde::{Deserialize, Serialize};

use crate::db::model::stamp_update;
use crate::models::{parse_object_id, Draft, Stored};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Book {
    title: String,
    pages: i32,
}

fn sample_book() -> Book {
    Book {
        title: "The Fall of Gondolin".to_string(),
        pages: 304,
    }
}

#[test]
fn drafts_get_unique_ids() {
    let a = Draft::new(sample_book());
    let b = Draft::new(sample_book());
    assert_ne!(a.id, b.id);
}

#[test]
fn stored_document_shape() {
    let stored = Stored::from_draft(Draft::new(sample_book()), false);
    let document = bson::to_document(&stored).unwrap();

    // Envelope fields sit alongside the flattened body.
    assert!(document.get_object_id("_id").is_ok());
    assert_eq!(document.get_i64("_revision").unwrap(), 0);
    assert_eq!(document.get_str("title").unwrap(), "The Fall of Gondolin");
    assert_eq!(document.get_i32("pages").unwrap(), 304);

    // Without timestamps the stamp fields are absent, not null.
    assert!(!document.contains_key("created_at"));
    assert!(!document.contains_key("updated_at"));
}

#[test]
fn timestamps_are_stamped_when_enabled() {
    let stored = Stored::from_draft(Draft::new(sample_book()), true);
    assert!(stored.created_at.is_some());
    assert_eq!(stored.created_at, stored.updated_at);

    let document = bson::to_document(&stored).unwrap();
    assert!(document.get_datetime("created_at").is_ok());
    assert!(document.get_datetime("updated_at").is_ok());
}

#[test]
fn stored_document_round_trips() {
    let stored = Stored::from_draft(Draft::new(sample_book()), true);
    let document = bson::to_document(&stored).unwrap();
    let back: Stored<Book> = bson::from_document(document).unwrap();
    assert_eq!(back, stored);
}

#[test]
fn missing_envelope_fields_default_on_read() {
    // Documents written by other tooling may carry no envelope at all.
    let document = doc! {
        "_id": mongodb::bson::oid::ObjectId::new(),
        "title": "Leaf by Niggle",
        "pages": 48,
    };
    let stored: Stored<Book> = bson::from_document(document).unwrap();
    assert_eq!(stored.revision, 0);
    assert!(stored.created_at.is_none());
    assert!(stored.updated_at.is_none());
}

#[test]
fn stamp_update_adds_updated_at() {
    let update = stamp_update(true, doc! { "$set": { "title": "x" } }.into());
    match update {
        UpdateModifications::Document(document) => {
            let set = document.get_document("$set").unwrap();
            assert_eq!(set.get_str("title").unwrap(), "x");
            assert!(set.get_datetime("updated_at").is_ok());
        }
        other => panic!("unexpected update shape: {other:?}"),
    }
}

#[test]
fn stamp_update_creates_set_stage_when_absent() {
    let update = stamp_update(true, doc! { "$inc": { "pages": 1 } }.into());
    match update {
        UpdateModifications::Document(document) => {
            assert!(document.get_document("$inc").is_ok());
            let set = document.get_document("$set").unwrap();
            assert!(set.get_datetime("updated_at").is_ok());
        }
        other => panic!("unexpected update shape: {other:?}"),
    }
}

#[test]
fn stamp_update_respects_caller_supplied_stamp() {
    let stamp = mongodb::bson::DateTime::from_millis(0);
    let update = stamp_update(true, doc! { "$set": { "updated_at": stamp } }.into());
    match update {
        UpdateModifications::Document(document) => {
            let set = document.get_document("$set").unwrap();
            assert_eq!(set.get_datetime("updated_at").unwrap(), &stamp);
        }
        other => panic!("unexpected update shape: {other:?}"),
    }
}

#[test]
fn stamp_update_is_inert_without_timestamps() {
    let original = doc! { "$set": { "title": "x" } };
    let update = stamp_update(false, original.clone().into());
    assert_eq!(update, UpdateModifications::Document(original));
}

#[test]
fn stamp_update_leaves_pipelines_alone() {
    let pipeline = vec![doc! { "$set": { "title": "x" } }];
    let update = stamp_update(true, pipeline.clone().into());
    assert_eq!(update, UpdateModifications::Pipeline(pipeline));
}

#[test]
fn object_id_parsing() {
    let id = parse_object_id("63f6d434301bfc3ddb726852").unwrap();
    assert_eq!(id.to_hex(), "63f6d434301bfc3ddb726852");

    assert!(parse_object_id("not-an-id").is_err());
    assert!(parse_object_id("").is_err());
}
