pub mod database;
pub mod metrics;
pub mod product;
pub mod store;

pub use database::MongoProductStore;
pub use metrics::{get_metrics, init_metrics, record_operation};
pub use product::{ProductError, ProductService};
pub use store::{InMemoryProductStore, ProductStore, ReplaceOutcome, StoreError};
