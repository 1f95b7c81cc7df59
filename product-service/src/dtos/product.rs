use crate::models::{Attributes, Product, ProductDraft};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body accepted by `POST /api/product` and `PUT /api/product/:id`.
///
/// `id` is accepted for wire compatibility but never used: the store assigns
/// ids on create and the path wins on update.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub additional_attributes: Option<Attributes>,
}

impl From<ProductRequest> for ProductDraft {
    fn from(req: ProductRequest) -> Self {
        Self {
            name: req.name,
            price: req.price,
            additional_attributes: req.additional_attributes.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[schema(value_type = Object)]
    pub additional_attributes: Attributes,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_hex(),
            name: product.name,
            price: product.price,
            additional_attributes: product.additional_attributes,
        }
    }
}
