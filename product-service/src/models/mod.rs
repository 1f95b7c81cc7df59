pub mod product;

pub use product::{Attributes, Product, ProductDraft};
