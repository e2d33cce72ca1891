use super::{Money, Product};

/// One line in the cart, keyed by `product_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub store_id: Option<String>,
}

impl CartItem {
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            unit_price,
            quantity,
            store_id: None,
        }
    }

    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self::new(product.id.clone(), product.name.clone(), product.price, quantity)
    }

    pub fn with_store(mut self, store_id: impl Into<String>) -> Self {
        self.store_id = Some(store_id.into());
        self
    }

    pub fn line_total(&self) -> Option<Money> {
        self.unit_price.checked_mul(u64::from(self.quantity))
    }
}

/// Totals across the whole cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartSummary {
    pub line_count: usize,
    pub item_count: u32,
    pub subtotal: Money,
}
