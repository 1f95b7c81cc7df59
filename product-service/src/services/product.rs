//! Product operations: list, create, get by id, update.
//!
//! Each call is an independent round trip to the store. Update is a
//! read-modify-write of two separate store calls with no lock in between;
//! concurrent updates of one id resolve as "last replace wins".
//!
//! Ids arrive as ObjectId hex strings. A string that is not a valid ObjectId
//! can never match a stored product and is reported as not found without
//! touching the store.

use crate::models::{Product, ProductDraft};
use crate::services::metrics::record_operation;
use crate::services::store::{ProductStore, StoreError};
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;
use std::sync::Arc;
use thiserror::Error;

pub const NOT_FOUND_MESSAGE: &str = "Product not found";
pub const UPDATE_FAILED_MESSAGE: &str = "Update failed";

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,

    /// The replace was not acknowledged or changed no document.
    #[error("{}", UPDATE_FAILED_MESSAGE)]
    UpdateRejected,

    /// Any store failure, carrying the store's own description.
    #[error("{0}")]
    StorageFault(String),
}

impl ProductError {
    fn outcome(&self) -> &'static str {
        match self {
            ProductError::NotFound => "not_found",
            ProductError::UpdateRejected => "rejected",
            ProductError::StorageFault(_) => "fault",
        }
    }
}

impl From<StoreError> for ProductError {
    fn from(err: StoreError) -> Self {
        ProductError::StorageFault(err.to_string())
    }
}

/// Everything but a missing product is a 400 at the HTTP boundary.
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound => AppError::NotFound(anyhow::anyhow!(NOT_FOUND_MESSAGE)),
            ProductError::UpdateRejected => {
                AppError::BadRequest(anyhow::anyhow!(UPDATE_FAILED_MESSAGE))
            }
            ProductError::StorageFault(message) => AppError::BadRequest(anyhow::anyhow!(message)),
        }
    }
}

fn observe<T>(operation: &'static str, result: Result<T, ProductError>) -> Result<T, ProductError> {
    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) => e.outcome(),
    };
    record_operation(operation, outcome);
    result
}

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Product>, ProductError> {
        let result = self.store.find_all().await.map_err(ProductError::from);
        observe("list", result)
    }

    /// Insert a new product. The store assigns the id.
    pub async fn create(&self, candidate: ProductDraft) -> Result<Product, ProductError> {
        let result = self.store.insert(candidate).await.map_err(ProductError::from);
        if let Ok(product) = &result {
            tracing::info!(product_id = %product.id, "Product created");
        }
        observe("create", result)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Product, ProductError> {
        let result = self.find(id).await;
        observe("get", result)
    }

    /// Overwrite `name`, `price` and `additionalAttributes` of the product
    /// at `id`. The stored id never changes.
    pub async fn update(&self, id: &str, updated: ProductDraft) -> Result<Product, ProductError> {
        let result = self.read_modify_write(id, updated).await;
        observe("update", result)
    }

    pub async fn health_check(&self) -> Result<(), ProductError> {
        self.store.health_check().await.map_err(ProductError::from)
    }

    async fn find(&self, id: &str) -> Result<Product, ProductError> {
        let Ok(object_id) = ObjectId::parse_str(id) else {
            tracing::debug!(product_id = %id, "Id is not an ObjectId; nothing can match");
            return Err(ProductError::NotFound);
        };

        self.store
            .find_by_id(&object_id)
            .await?
            .ok_or(ProductError::NotFound)
    }

    async fn read_modify_write(
        &self,
        id: &str,
        updated: ProductDraft,
    ) -> Result<Product, ProductError> {
        let mut product = self.find(id).await?;
        product.apply(updated);

        let outcome = self.store.replace(&product.id, &product).await?;

        if !outcome.is_applied() {
            tracing::warn!(
                product_id = %id,
                acknowledged = outcome.acknowledged,
                matched = outcome.matched_count,
                modified = outcome.modified_count,
                "Product update was not applied"
            );
            return Err(ProductError::UpdateRejected);
        }

        tracing::info!(product_id = %id, "Product updated");
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::store::{InMemoryProductStore, ReplaceOutcome};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;

    /// Store that fails every call with a fixed driver message.
    struct FaultyStore;

    #[async_trait]
    impl ProductStore for FaultyStore {
        async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
            Err(StoreError::Unavailable("connection reset".to_string()))
        }

        async fn find_by_id(&self, _id: &ObjectId) -> Result<Option<Product>, StoreError> {
            Err(StoreError::Unavailable("connection reset".to_string()))
        }

        async fn insert(&self, _draft: ProductDraft) -> Result<Product, StoreError> {
            Err(StoreError::Unavailable("connection reset".to_string()))
        }

        async fn replace(
            &self,
            _id: &ObjectId,
            _product: &Product,
        ) -> Result<ReplaceOutcome, StoreError> {
            Err(StoreError::Unavailable("connection reset".to_string()))
        }

        async fn health_check(&self) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection reset".to_string()))
        }
    }

    /// Lookups succeed but every replace blows up.
    struct ReplaceFailsStore(InMemoryProductStore);

    #[async_trait]
    impl ProductStore for ReplaceFailsStore {
        async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
            self.0.find_all().await
        }

        async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Product>, StoreError> {
            self.0.find_by_id(id).await
        }

        async fn insert(&self, draft: ProductDraft) -> Result<Product, StoreError> {
            self.0.insert(draft).await
        }

        async fn replace(
            &self,
            _id: &ObjectId,
            _product: &Product,
        ) -> Result<ReplaceOutcome, StoreError> {
            Err(StoreError::Unavailable("write conflict".to_string()))
        }

        async fn health_check(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn service() -> ProductService {
        ProductService::new(Arc::new(InMemoryProductStore::new()))
    }

    fn draft(name: &str, price: f64, color: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            price,
            additional_attributes: HashMap::from([("color".to_string(), json!(color))]),
        }
    }

    #[tokio::test]
    async fn create_then_get_returns_same_fields() {
        let service = service();
        let created = service.create(draft("Widget", 9.99, "red")).await.unwrap();

        let fetched = service.get_by_id(&created.id.to_hex()).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "Widget");
        assert_eq!(fetched.price, 9.99);
        assert_eq!(fetched.additional_attributes["color"], json!("red"));
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let service = service();
        let ids = [
            "nonexistent",
            "65f1c0ffee0000000000abcd",
            "",
            "zz",
            "not-a-valid-objectid!!",
        ];
        for id in ids {
            assert!(matches!(
                service.get_by_id(id).await,
                Err(ProductError::NotFound)
            ));
        }
    }

    #[tokio::test]
    async fn malformed_ids_never_reach_the_store() {
        // FaultyStore would turn any store call into a storage fault.
        let service = ProductService::new(Arc::new(FaultyStore));

        assert!(matches!(
            service.get_by_id("not-a-valid-objectid!!").await,
            Err(ProductError::NotFound)
        ));
        assert!(matches!(
            service.update("zz", draft("Widget", 1.0, "red")).await,
            Err(ProductError::NotFound)
        ));
    }

    #[tokio::test]
    async fn list_returns_every_created_product_once() {
        let service = service();
        let mut ids = Vec::new();
        for i in 0..5 {
            let p = service
                .create(draft(&format!("p{}", i), i as f64, "red"))
                .await
                .unwrap();
            ids.push(p.id);
        }

        let mut listed: Vec<ObjectId> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        listed.sort();
        ids.sort();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn list_on_empty_store_is_empty() {
        assert!(service().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_overwrites_fields_and_keeps_id() {
        let service = service();
        let created = service.create(draft("Widget", 9.99, "red")).await.unwrap();

        let id = created.id.to_hex();

        let updated = service
            .update(&id, draft("Widget v2", 12.50, "blue"))
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Widget v2");
        assert_eq!(updated.price, 12.50);
        assert_eq!(updated.additional_attributes["color"], json!("blue"));

        let fetched = service.get_by_id(&id).await.unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found_and_writes_nothing() {
        let store = Arc::new(InMemoryProductStore::new());
        let service = ProductService::new(store.clone());

        let result = service
            .update("nonexistent", draft("Ghost", 1.0, "none"))
            .await;
        assert!(matches!(result, Err(ProductError::NotFound)));

        let result = service
            .update(&ObjectId::new().to_hex(), draft("Ghost", 1.0, "none"))
            .await;
        assert!(matches!(result, Err(ProductError::NotFound)));
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn update_with_identical_values_is_rejected() {
        let service = service();
        let created = service.create(draft("Widget", 9.99, "red")).await.unwrap();

        let result = service
            .update(&created.id.to_hex(), draft("Widget", 9.99, "red"))
            .await;
        assert!(matches!(result, Err(ProductError::UpdateRejected)));
    }

    #[tokio::test]
    async fn unacknowledged_replace_is_rejected() {
        let service = ProductService::new(Arc::new(InMemoryProductStore::unacknowledged()));
        let created = service.create(draft("Widget", 9.99, "red")).await.unwrap();

        let result = service
            .update(&created.id.to_hex(), draft("Widget v2", 12.5, "blue"))
            .await;
        assert!(matches!(result, Err(ProductError::UpdateRejected)));
    }

    #[tokio::test]
    async fn store_failures_surface_as_storage_fault_with_message() {
        let service = ProductService::new(Arc::new(FaultyStore));

        match service.list().await {
            Err(ProductError::StorageFault(msg)) => assert_eq!(msg, "connection reset"),
            other => panic!("expected storage fault, got {:?}", other),
        }
        assert!(matches!(
            service.create(draft("Widget", 1.0, "red")).await,
            Err(ProductError::StorageFault(_))
        ));
        let id = ObjectId::new().to_hex();
        assert!(matches!(
            service.get_by_id(&id).await,
            Err(ProductError::StorageFault(_))
        ));
        assert!(matches!(
            service.update(&id, draft("Widget", 1.0, "red")).await,
            Err(ProductError::StorageFault(_))
        ));
    }

    #[tokio::test]
    async fn replace_fault_takes_precedence_over_outcome_check() {
        let store = ReplaceFailsStore(InMemoryProductStore::new());
        let existing = store.insert(draft("Widget", 9.99, "red")).await.unwrap();
        let service = ProductService::new(Arc::new(store));

        match service
            .update(&existing.id.to_hex(), draft("Widget v2", 12.5, "blue"))
            .await
        {
            Err(ProductError::StorageFault(msg)) => assert_eq!(msg, "write conflict"),
            other => panic!("expected storage fault, got {:?}", other),
        }
    }

    #[test]
    fn http_mapping_is_404_for_missing_and_400_otherwise() {
        use axum::http::StatusCode;
        use axum::response::IntoResponse;

        let status = |e: ProductError| AppError::from(e).into_response().status();
        assert_eq!(status(ProductError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status(ProductError::UpdateRejected), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(ProductError::StorageFault("boom".to_string())),
            StatusCode::BAD_REQUEST
        );
    }
}
