pub mod health;
pub mod products;

pub use health::{health_check, metrics_endpoint, readiness_check};
pub use products::{create_product, get_product, list_products, update_product};
