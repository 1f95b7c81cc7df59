#![allow(dead_code)]

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use product_service::config::{MongoConfig, ProductConfig, StoreBackend, DEFAULT_MONGODB_URI};
use product_service::models::{Product, ProductDraft};
use product_service::services::{InMemoryProductStore, ProductStore, ReplaceOutcome, StoreError};
use product_service::startup::Application;
use service_core::config::Config as CoreConfig;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

pub fn test_config(store: StoreBackend) -> ProductConfig {
    ProductConfig {
        common: CoreConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0, // Random port for testing
        },
        store,
        mongodb: MongoConfig {
            uri: std::env::var("TEST_MONGODB_URI")
                .unwrap_or_else(|_| DEFAULT_MONGODB_URI.to_string()),
            database: format!("product_test_{}", uuid::Uuid::new_v4()),
            collection: "product".to_string(),
        },
    }
}

impl TestApp {
    /// Spawn the service over a fresh in-memory store.
    pub async fn spawn() -> Self {
        Self::spawn_with_store(Arc::new(InMemoryProductStore::new())).await
    }

    pub async fn spawn_with_store(store: Arc<dyn ProductStore>) -> Self {
        let app = Application::build_with_store(test_config(StoreBackend::Memory), store)
            .await
            .expect("Failed to build test application");

        Self::start(app).await
    }

    pub async fn start(app: Application) -> Self {
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn create(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/product"))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, id: &str) -> reqwest::Response {
        self.client
            .get(self.url(&format!("/api/product/{}", id)))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn update(&self, id: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .put(self.url(&format!("/api/product/{}", id)))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn list(&self) -> reqwest::Response {
        self.client
            .get(self.url("/api/product"))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// Store whose every call fails with the given message.
pub struct FaultyStore(pub &'static str);

#[async_trait]
impl ProductStore for FaultyStore {
    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        Err(StoreError::Unavailable(self.0.to_string()))
    }

    async fn find_by_id(&self, _id: &ObjectId) -> Result<Option<Product>, StoreError> {
        Err(StoreError::Unavailable(self.0.to_string()))
    }

    async fn insert(&self, _draft: ProductDraft) -> Result<Product, StoreError> {
        Err(StoreError::Unavailable(self.0.to_string()))
    }

    async fn replace(
        &self,
        _id: &ObjectId,
        _product: &Product,
    ) -> Result<ReplaceOutcome, StoreError> {
        Err(StoreError::Unavailable(self.0.to_string()))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable(self.0.to_string()))
    }
}
