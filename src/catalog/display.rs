use crate::domain::{Deal, Money, Product, Store};

/// The two product shapes the storefront renders side by side.
#[derive(Debug, Clone, Copy)]
pub enum ProductSource<'a> {
    Catalog(&'a Product),
    Deal { deal: &'a Deal, store: Option<&'a Store> },
}

/// Canonical card shown in listings, whichever shape it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayProduct {
    pub id: String,
    pub name: String,
    pub price: Money,
    /// Set when the card shows a struck-through price.
    pub original_price: Option<Money>,
    pub image: String,
    pub rating: Option<f32>,
    pub store_name: Option<String>,
    pub in_stock: bool,
}

impl DisplayProduct {
    /// Amount saved against the original price, if any.
    pub fn savings(&self) -> Option<Money> {
        self.original_price
            .and_then(|original| original.units().checked_sub(self.price.units()))
            .filter(|saved| *saved > 0)
            .map(Money::new)
    }
}

impl From<ProductSource<'_>> for DisplayProduct {
    fn from(source: ProductSource<'_>) -> Self {
        match source {
            ProductSource::Catalog(product) => product.into(),
            ProductSource::Deal { deal, store } => Self {
                id: deal.id.clone(),
                name: deal.title.clone(),
                price: deal.deal_price,
                original_price: Some(deal.original_price),
                image: deal.image.clone(),
                rating: None,
                store_name: store.map(|s| s.name.clone()),
                in_stock: true,
            },
        }
    }
}

impl From<&Product> for DisplayProduct {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            original_price: None,
            image: product.image.clone(),
            rating: Some(product.rating),
            store_name: None,
            in_stock: product.in_stock && product.stock > 0,
        }
    }
}
