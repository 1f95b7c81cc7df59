use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Free-form key/value extension data carried by a product.
pub type Attributes = HashMap<String, Value>;

/// A product as persisted in the `product` collection, keyed by a native
/// ObjectId `_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub price: f64,
    #[serde(rename = "additionalAttributes", default)]
    pub additional_attributes: Attributes,
}

/// The caller-controlled part of a product: everything except `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub price: f64,
    pub additional_attributes: Attributes,
}

impl Product {
    pub fn from_draft(id: ObjectId, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            price: draft.price,
            additional_attributes: draft.additional_attributes,
        }
    }

    /// Overwrite every mutable field wholesale. `id` is left untouched and
    /// attributes are replaced, not merged.
    pub fn apply(&mut self, draft: ProductDraft) {
        self.name = draft.name;
        self.price = draft.price;
        self.additional_attributes = draft.additional_attributes;
    }
}
