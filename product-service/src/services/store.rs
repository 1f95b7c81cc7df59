use crate::models::{Product, ProductDraft};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] mongodb::error::Error),

    #[error("{0}")]
    Unavailable(String),
}

/// Write outcome of a whole-document replace, as reported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceOutcome {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

impl ReplaceOutcome {
    /// True only when the write was acknowledged and changed a document.
    pub fn is_applied(&self) -> bool {
        self.acknowledged && self.modified_count > 0
    }
}

/// Persistence port for products. One handle is created at startup and
/// shared by every request.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Every stored product in the store's natural order.
    async fn find_all(&self) -> Result<Vec<Product>, StoreError>;
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Product>, StoreError>;
    /// Persist a new product under a freshly generated id.
    async fn insert(&self, draft: ProductDraft) -> Result<Product, StoreError>;
    async fn replace(
        &self,
        id: &ObjectId,
        product: &Product,
    ) -> Result<ReplaceOutcome, StoreError>;
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Process-local store for tests and local runs without MongoDB.
///
/// Scan order is insertion order. Replace reports `modified_count == 0` when
/// the replacement equals the stored document, the same way MongoDB does.
pub struct InMemoryProductStore {
    products: RwLock<Vec<Product>>,
    acknowledge_writes: bool,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(Vec::new()),
            acknowledge_writes: true,
        }
    }

    /// A store whose replaces are applied but reported as unacknowledged,
    /// mimicking a `w: 0` write concern.
    pub fn unacknowledged() -> Self {
        Self {
            acknowledge_writes: false,
            ..Self::new()
        }
    }

    pub async fn count(&self) -> usize {
        self.products.read().await.len()
    }
}

impl Default for InMemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.read().await.clone())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Product>, StoreError> {
        Ok(self
            .products
            .read()
            .await
            .iter()
            .find(|p| p.id == *id)
            .cloned())
    }

    async fn insert(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        let product = Product::from_draft(ObjectId::new(), draft);
        self.products.write().await.push(product.clone());

        tracing::debug!(product_id = %product.id, "[MEMORY] Product inserted");
        Ok(product)
    }

    async fn replace(
        &self,
        id: &ObjectId,
        product: &Product,
    ) -> Result<ReplaceOutcome, StoreError> {
        let mut products = self.products.write().await;

        let (matched_count, modified_count) = match products.iter_mut().find(|p| p.id == *id) {
            Some(existing) if existing == product => (1, 0),
            Some(existing) => {
                *existing = product.clone();
                (1, 1)
            }
            None => (0, 0),
        };

        if !self.acknowledge_writes {
            return Ok(ReplaceOutcome {
                acknowledged: false,
                matched_count: 0,
                modified_count: 0,
            });
        }

        Ok(ReplaceOutcome {
            acknowledged: true,
            matched_count,
            modified_count,
        })
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
