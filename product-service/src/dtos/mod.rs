pub mod product;

pub use product::{ProductRequest, ProductResponse};
