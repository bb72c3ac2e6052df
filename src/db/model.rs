use futures::future::try_join_all;
use futures::stream::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Bson, DateTime, Document};
use mongodb::options::{ReturnDocument, UpdateModifications};
use mongodb::results::{DeleteResult, UpdateResult};
use mongodb::{Collection, Database};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::errors::StoreError;
use crate::models::{Draft, ModelSpec, Stored};

/// A registered model bound to entity type `T`.
///
/// Every method is one driver call plus envelope stamping; failures are the
/// driver's own errors.
pub struct Model<T>
where
    T: Send + Sync,
{
    spec: ModelSpec,
    stored: Collection<Stored<T>>,
    raw: Collection<Document>,
}

impl<T> Model<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    pub(crate) fn bind(db: &Database, spec: ModelSpec) -> Self {
        let stored = db.collection(spec.collection_name());
        let raw = db.collection(spec.collection_name());
        Self { spec, stored, raw }
    }

    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    pub fn collection(&self) -> &Collection<Stored<T>> {
        &self.stored
    }

    pub fn raw_collection(&self) -> &Collection<Document> {
        &self.raw
    }

    /// Instantiates an unsaved document. Nothing is persisted.
    pub fn new_one(&self, body: T) -> Draft<T> {
        Draft::new(body)
    }

    pub fn new_many(&self, bodies: Vec<T>) -> Vec<Draft<T>> {
        bodies.into_iter().map(Draft::new).collect()
    }

    pub async fn save_one(&self, draft: Draft<T>) -> Result<Stored<T>, StoreError> {
        let stored = Stored::from_draft(draft, self.spec.timestamps_enabled());
        self.stored.insert_one(&stored).await?;
        Ok(stored)
    }

    /// Persists a batch of drafts in one insert, returning the stored forms
    /// in input order.
    pub async fn save_many(&self, drafts: Vec<Draft<T>>) -> Result<Vec<Stored<T>>, StoreError> {
        if drafts.is_empty() {
            return Ok(Vec::new());
        }
        let timestamps = self.spec.timestamps_enabled();
        let stored: Vec<Stored<T>> = drafts
            .into_iter()
            .map(|draft| Stored::from_draft(draft, timestamps))
            .collect();
        self.stored.insert_many(&stored).await?;
        Ok(stored)
    }

    /// Instantiates and persists plain bodies in a single call.
    pub async fn create_many(&self, bodies: Vec<T>) -> Result<Vec<Stored<T>>, StoreError> {
        self.save_many(self.new_many(bodies)).await
    }

    /// Inserts raw BSON documents as-is, bypassing envelope stamping.
    /// Returns the inserted ids in input order.
    pub async fn insert_many_raw(&self, docs: Vec<Document>) -> Result<Vec<Bson>, StoreError> {
        if docs.is_empty() {
            return Ok(Vec::new());
        }
        let count = docs.len();
        let result = self.raw.insert_many(docs).await?;
        let mut ids = result.inserted_ids;
        Ok((0..count)
            .map(|index| ids.remove(&index).unwrap_or(Bson::Null))
            .collect())
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Stored<T>>, StoreError> {
        Ok(self.stored.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_one(&self, filter: Document) -> Result<Option<Stored<T>>, StoreError> {
        Ok(self.stored.find_one(filter).await?)
    }

    pub async fn find_many(&self, filter: Document) -> Result<Vec<Stored<T>>, StoreError> {
        let cursor = self.stored.find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Deletes a batch of documents by id, issuing the single-item deletes
    /// concurrently. Any failure fails the whole batch; completed deletes
    /// are not rolled back. Output order matches input order.
    pub async fn find_by_id_and_delete(
        &self,
        ids: &[ObjectId],
    ) -> Result<Vec<Option<Stored<T>>>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let deletes = ids.iter().map(|id| {
            let collection = self.stored.clone();
            let id = *id;
            async move { collection.find_one_and_delete(doc! { "_id": id }).await }
        });
        Ok(try_join_all(deletes).await?)
    }

    pub async fn delete_one(&self, filter: Document) -> Result<DeleteResult, StoreError> {
        Ok(self.stored.delete_one(filter).await?)
    }

    pub async fn delete_many(&self, filter: Document) -> Result<DeleteResult, StoreError> {
        Ok(self.stored.delete_many(filter).await?)
    }

    pub async fn find_by_id_and_update(
        &self,
        id: ObjectId,
        update: impl Into<UpdateModifications>,
        returns: ReturnDocument,
    ) -> Result<Option<Stored<T>>, StoreError> {
        let update = stamp_update(self.spec.timestamps_enabled(), update.into());
        Ok(self
            .stored
            .find_one_and_update(doc! { "_id": id }, update)
            .return_document(returns)
            .await?)
    }

    pub async fn update_one(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> Result<UpdateResult, StoreError> {
        let update = stamp_update(self.spec.timestamps_enabled(), update.into());
        Ok(self.stored.update_one(filter, update).await?)
    }

    pub async fn update_many(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> Result<UpdateResult, StoreError> {
        let update = stamp_update(self.spec.timestamps_enabled(), update.into());
        Ok(self.stored.update_many(filter, update).await?)
    }

    /// Replaces the whole document. The replacement gets fresh envelope
    /// fields, matching a first save.
    pub async fn find_by_id_and_replace(
        &self,
        id: ObjectId,
        body: T,
        returns: ReturnDocument,
    ) -> Result<Option<Stored<T>>, StoreError> {
        let replacement = Stored::from_draft(Draft { id, body }, self.spec.timestamps_enabled());
        Ok(self
            .stored
            .find_one_and_replace(doc! { "_id": id }, &replacement)
            .return_document(returns)
            .await?)
    }

    pub async fn count(&self, filter: Document) -> Result<u64, StoreError> {
        Ok(self.stored.count_documents(filter).await?)
    }

    pub async fn distinct(&self, field: &str, filter: Document) -> Result<Vec<Bson>, StoreError> {
        Ok(self.stored.distinct(field, filter).await?)
    }

    /// Id of some document matching the filter, or `None`.
    pub async fn exists(&self, filter: Document) -> Result<Option<Bson>, StoreError> {
        let found = self
            .raw
            .find_one(filter)
            .projection(doc! { "_id": 1 })
            .await?;
        Ok(found.and_then(|document| document.get("_id").cloned()))
    }

    /// Creates the indexes declared on the model spec, returning their names.
    pub async fn sync_indexes(&self) -> Result<Vec<String>, StoreError> {
        if self.spec.indexes().is_empty() {
            return Ok(Vec::new());
        }
        let indexes: Vec<_> = self
            .spec
            .indexes()
            .iter()
            .map(|index| index.to_index_model())
            .collect();
        let result = self.stored.create_indexes(indexes).await?;
        debug!(
            "Created {} index(es) on {}",
            result.index_names.len(),
            self.spec.collection_name()
        );
        Ok(result.index_names)
    }
}

/// Folds an `updated_at` stamp into a `$set`-style update when the model
/// tracks timestamps. A caller-supplied `updated_at` wins; aggregation
/// pipelines pass through untouched.
pub(crate) fn stamp_update(timestamps: bool, update: UpdateModifications) -> UpdateModifications {
    if !timestamps {
        return update;
    }
    match update {
        UpdateModifications::Document(mut update) => {
            if !update.contains_key("$set") {
                update.insert("$set", Document::new());
            }
            if let Ok(set) = update.get_document_mut("$set") {
                if !set.contains_key("updated_at") {
                    set.insert("updated_at", DateTime::now());
                }
            }
            UpdateModifications::Document(update)
        }
        other => other,
    }
}
