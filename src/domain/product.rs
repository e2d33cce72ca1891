use serde::{Deserialize, Serialize};
use super::Money;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub description: String,
    pub category: String,
    pub image: String,
    pub rating: f32,
    pub stock: u32,
    pub brand: String,
    pub model: String,
    pub in_stock: bool,
}

impl Product {
    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            unit_price: self.price,
        }
    }
}

/// The slice of a product that a bulk quote keeps.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub unit_price: Money,
}

/// A store's asking price for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub store_id: String,
    pub product_id: String,
    pub price: Money,
    pub in_stock: bool,
}

/// A promotional deal. Shaped differently from [`Product`]; see
/// [`crate::catalog::DisplayProduct`] for the normalised view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    pub title: String,
    pub original_price: Money,
    pub deal_price: Money,
    pub store_id: String,
    pub image: String,
}
