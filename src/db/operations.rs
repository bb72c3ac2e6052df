use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document};
use mongodb::options::{ReturnDocument, UpdateModifications};
use mongodb::results::{DeleteResult, UpdateResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::DocumentStore;
use crate::errors::StoreError;
use crate::models::{Draft, Stored};

/// Name-keyed convenience surface: every method resolves the model by name
/// and forwards to the typed [`Model`](crate::db::Model) handle.
impl DocumentStore {
    pub fn new_one<T>(&self, name: &str, body: T) -> Result<Draft<T>, StoreError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        Ok(self.model(name)?.new_one(body))
    }

    pub fn new_many<T>(&self, name: &str, bodies: Vec<T>) -> Result<Vec<Draft<T>>, StoreError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        Ok(self.model(name)?.new_many(bodies))
    }

    pub async fn save_one<T>(&self, name: &str, draft: Draft<T>) -> Result<Stored<T>, StoreError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        self.model(name)?.save_one(draft).await
    }

    pub async fn save_many<T>(
        &self,
        name: &str,
        drafts: Vec<Draft<T>>,
    ) -> Result<Vec<Stored<T>>, StoreError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        self.model(name)?.save_many(drafts).await
    }

    pub async fn create_many<T>(
        &self,
        name: &str,
        bodies: Vec<T>,
    ) -> Result<Vec<Stored<T>>, StoreError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        self.model(name)?.create_many(bodies).await
    }

    pub async fn insert_many_raw(
        &self,
        name: &str,
        docs: Vec<Document>,
    ) -> Result<Vec<Bson>, StoreError> {
        self.model::<Document>(name)?.insert_many_raw(docs).await
    }

    pub async fn find_by_id<T>(
        &self,
        name: &str,
        id: ObjectId,
    ) -> Result<Option<Stored<T>>, StoreError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        self.model(name)?.find_by_id(id).await
    }

    pub async fn find_one<T>(
        &self,
        name: &str,
        filter: Document,
    ) -> Result<Option<Stored<T>>, StoreError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        self.model(name)?.find_one(filter).await
    }

    pub async fn find_many<T>(
        &self,
        name: &str,
        filter: Document,
    ) -> Result<Vec<Stored<T>>, StoreError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        self.model(name)?.find_many(filter).await
    }

    pub async fn find_by_id_and_delete<T>(
        &self,
        name: &str,
        ids: &[ObjectId],
    ) -> Result<Vec<Option<Stored<T>>>, StoreError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        self.model(name)?.find_by_id_and_delete(ids).await
    }

    pub async fn delete_one(
        &self,
        name: &str,
        filter: Document,
    ) -> Result<DeleteResult, StoreError> {
        self.model::<Document>(name)?.delete_one(filter).await
    }

    pub async fn delete_many(
        &self,
        name: &str,
        filter: Document,
    ) -> Result<DeleteResult, StoreError> {
        self.model::<Document>(name)?.delete_many(filter).await
    }

    pub async fn find_by_id_and_update<T, U>(
        &self,
        name: &str,
        id: ObjectId,
        update: U,
        returns: ReturnDocument,
    ) -> Result<Option<Stored<T>>, StoreError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        U: Into<UpdateModifications>,
    {
        self.model(name)?.find_by_id_and_update(id, update, returns).await
    }

    pub async fn update_one(
        &self,
        name: &str,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> Result<UpdateResult, StoreError> {
        self.model::<Document>(name)?.update_one(filter, update).await
    }

    pub async fn update_many(
        &self,
        name: &str,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> Result<UpdateResult, StoreError> {
        self.model::<Document>(name)?.update_many(filter, update).await
    }

    pub async fn find_by_id_and_replace<T>(
        &self,
        name: &str,
        id: ObjectId,
        body: T,
        returns: ReturnDocument,
    ) -> Result<Option<Stored<T>>, StoreError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        self.model(name)?.find_by_id_and_replace(id, body, returns).await
    }

    pub async fn count(&self, name: &str, filter: Document) -> Result<u64, StoreError> {
        self.model::<Document>(name)?.count(filter).await
    }

    pub async fn distinct(
        &self,
        name: &str,
        field: &str,
        filter: Document,
    ) -> Result<Vec<Bson>, StoreError> {
        self.model::<Document>(name)?.distinct(field, filter).await
    }

    pub async fn exists(&self, name: &str, filter: Document) -> Result<Option<Bson>, StoreError> {
        self.model::<Document>(name)?.exists(filter).await
    }

    pub async fn sync_indexes(&self, name: &str) -> Result<Vec<String>, StoreError> {
        self.model::<Document>(name)?.sync_indexes().await
    }
}
