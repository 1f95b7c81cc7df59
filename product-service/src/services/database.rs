use crate::models::{Product, ProductDraft};
use crate::services::store::{ProductStore, ReplaceOutcome, StoreError};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Client as MongoClient, Collection,
};
use service_core::error::AppError;

/// MongoDB-backed product store. The client and collection handle are
/// created once at startup; the driver pools connections underneath.
#[derive(Clone)]
pub struct MongoProductStore {
    client: MongoClient,
    collection: Collection<Product>,
}

impl MongoProductStore {
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::from(e)
        })?;
        let collection: Collection<Product> = client.database(database).collection(collection);
        tracing::info!(
            database = %database,
            collection = %collection.name(),
            "Successfully connected to MongoDB database"
        );
        Ok(Self { client, collection })
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

#[async_trait]
impl ProductStore for MongoProductStore {
    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let cursor = self.collection.find(doc! {}, None).await.map_err(|e| {
            tracing::error!("Failed to list products: {}", e);
            StoreError::from(e)
        })?;

        let products: Vec<Product> = cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect products: {}", e);
            StoreError::from(e)
        })?;

        Ok(products)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Product>, StoreError> {
        self.collection
            .find_one(doc! { "_id": *id }, None)
            .await
            .map_err(|e| {
                tracing::error!(product_id = %id, "Failed to find product: {}", e);
                StoreError::from(e)
            })
    }

    async fn insert(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        let product = Product::from_draft(ObjectId::new(), draft);

        self.collection
            .insert_one(&product, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert product: {}", e);
                StoreError::from(e)
            })?;

        Ok(product)
    }

    async fn replace(
        &self,
        id: &ObjectId,
        product: &Product,
    ) -> Result<ReplaceOutcome, StoreError> {
        let result = self
            .collection
            .replace_one(doc! { "_id": *id }, product, None)
            .await
            .map_err(|e| {
                tracing::error!(product_id = %id, "Failed to replace product: {}", e);
                StoreError::from(e)
            })?;

        // Writes use the collection's default write concern, which is
        // acknowledged; an unacknowledged write never yields counts.
        Ok(ReplaceOutcome {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                StoreError::from(e)
            })?;
        Ok(())
    }
}
