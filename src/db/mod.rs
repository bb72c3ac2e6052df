use mongodb::bson::doc;
use mongodb::{Client, Collection, Database};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::errors::StoreError;
use crate::models::ModelSpec;

pub mod model;
pub mod operations;
pub mod registry;

pub use model::Model;
pub use registry::ModelRegistry;

/// Facade over one MongoDB connection and its model registry.
///
/// All CRUD helpers are thin forwarding calls into the driver; the store
/// adds envelope stamping and name-to-collection resolution, nothing else.
/// `close` consumes the store, so the connection is released exactly once
/// and the handle cannot be used afterwards.
pub struct DocumentStore {
    client: Client,
    db: Database,
    registry: ModelRegistry,
}

impl DocumentStore {
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&config.mongodb_uri).await?;

        let db = match &config.database {
            Some(name) => client.database(name),
            None => client.default_database().ok_or(StoreError::NoDatabase)?,
        };

        // Round trip before handing the store out, so a bad URI fails here
        // instead of on the first operation.
        db.run_command(doc! { "ping": 1 }).await?;
        info!("Connected to MongoDB database {}", db.name());

        Ok(Self {
            client,
            db,
            registry: ModelRegistry::default(),
        })
    }

    /// Registers one or more model specs. Registering a name twice is an
    /// error rather than a silent overwrite.
    pub fn register_models<I>(&mut self, specs: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = ModelSpec>,
    {
        for spec in specs {
            self.registry.register(spec)?;
        }
        Ok(())
    }

    /// Looks up a registered model and binds it to entity type `T`.
    pub fn model<T>(&self, name: &str) -> Result<Model<T>, StoreError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        let spec = self.registry.get(name)?;
        Ok(Model::bind(&self.db, spec.clone()))
    }

    /// Raw driver collection for a registered model, for call chains the
    /// named operations do not cover.
    pub fn collection<T>(&self, name: &str) -> Result<Collection<T>, StoreError>
    where
        T: Send + Sync,
    {
        let spec = self.registry.get(name)?;
        Ok(self.db.collection(spec.collection_name()))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// Shuts the connection down. Consumes the store; collection handles
    /// cloned out of it will error on use from here on.
    pub async fn close(self) {
        let name = self.db.name().to_string();
        self.client.shutdown().await;
        info!("Closed MongoDB connection for database {}", name);
    }
}
