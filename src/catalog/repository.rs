use std::cmp::Ordering;
use serde::Deserialize;
use tracing::{debug, info};
use crate::domain::{Deal, Listing, Money, Product, Store};
use super::display::{DisplayProduct, ProductSource};
use super::error::CatalogError;

const BUNDLED_CATALOG: &str = include_str!("data/catalog.json");

/// Read-only access to stores, products, listings and deals.
///
/// Consumers hold an `Arc<dyn CatalogRepository>`; the query helpers are
/// provided in terms of the four accessors, so a different backing source only
/// has to implement those.
pub trait CatalogRepository: Send + Sync {
    fn stores(&self) -> Vec<Store>;
    fn products(&self) -> Vec<Product>;
    fn listings(&self) -> Vec<Listing>;
    fn deals(&self) -> Vec<Deal>;

    fn store(&self, id: &str) -> Option<Store> {
        self.stores().into_iter().find(|s| s.id == id)
    }

    fn product(&self, id: &str) -> Option<Product> {
        self.products().into_iter().find(|p| p.id == id)
    }

    fn listings_for(&self, product_id: &str) -> Vec<Listing> {
        self.listings().into_iter().filter(|l| l.product_id == product_id).collect()
    }

    fn search_products(&self, query: &ProductQuery) -> Vec<Product> {
        let mut found: Vec<Product> = self.products().into_iter().filter(|p| query.matches(p)).collect();
        query.sort.apply(&mut found);
        found
    }

    fn find_stores(&self, query: &StoreQuery) -> Vec<Store> {
        let mut found: Vec<Store> = self.stores().into_iter().filter(|s| query.matches(s)).collect();
        query.sort.apply(&mut found);
        found
    }

    /// One row per store listing the product, joined with the store.
    fn compare_prices(
        &self,
        product_id: &str,
        sort: PriceSort,
        in_stock_only: bool,
    ) -> Result<Vec<PriceComparisonRow>, CatalogError> {
        if self.product(product_id).is_none() {
            return Err(CatalogError::ProductNotFound(product_id.to_string()));
        }
        let mut rows: Vec<PriceComparisonRow> = self
            .listings_for(product_id)
            .into_iter()
            .filter(|l| !in_stock_only || l.in_stock)
            .filter_map(|l| {
                self.store(&l.store_id).map(|store| PriceComparisonRow {
                    store,
                    price: l.price,
                    in_stock: l.in_stock,
                })
            })
            .collect();
        sort.apply(&mut rows);
        debug!(product_id, rows = rows.len(), "Price comparison built");
        Ok(rows)
    }

    /// Deals first, then the best-rated in-stock products, up to `limit` cards.
    fn featured(&self, limit: usize) -> Vec<DisplayProduct> {
        let stores = self.stores();
        let deals = self.deals();
        let mut cards: Vec<DisplayProduct> = deals
            .iter()
            .map(|deal| {
                let store = stores.iter().find(|s| s.id == deal.store_id);
                DisplayProduct::from(ProductSource::Deal { deal, store })
            })
            .collect();

        let mut products: Vec<Product> = self.products().into_iter().filter(|p| p.in_stock).collect();
        ProductSort::Rating.apply(&mut products);
        cards.extend(products.iter().map(|p| DisplayProduct::from(ProductSource::Catalog(p))));
        cards.truncate(limit);
        cards
    }
}

// =============================================================================
// QUERIES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    /// Catalog order.
    #[default]
    Relevance,
    PriceLowToHigh,
    PriceHighToLow,
    Rating,
    Name,
}

impl ProductSort {
    fn apply(self, products: &mut [Product]) {
        match self {
            Self::Relevance => {}
            Self::PriceLowToHigh => products.sort_by_key(|p| p.price),
            Self::PriceHighToLow => products.sort_by(|a, b| b.price.cmp(&a.price)),
            Self::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            Self::Name => products.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        }
    }
}

/// Filters for product browsing. Empty query matches everything.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub text: Option<String>,
    pub in_stock_only: bool,
    pub sort: ProductSort,
}

impl ProductQuery {
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn matching(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn in_stock(mut self) -> Self {
        self.in_stock_only = true;
        self
    }

    pub fn sorted_by(mut self, sort: ProductSort) -> Self {
        self.sort = sort;
        self
    }

    fn matches(&self, product: &Product) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| product.category.eq_ignore_ascii_case(c));
        let text_ok = self
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map_or(true, |t| product.name.to_lowercase().contains(&t.to_lowercase()));
        let stock_ok = !self.in_stock_only || (product.in_stock && product.stock > 0);
        category_ok && text_ok && stock_ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreSort {
    #[default]
    Distance,
    Rating,
    Name,
}

impl StoreSort {
    fn apply(self, stores: &mut [Store]) {
        match self {
            Self::Distance => stores.sort_by(|a, b| a.distance.total_cmp(&b.distance)),
            Self::Rating => stores.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            Self::Name => stores.sort_by(|a, b| a.name.cmp(&b.name)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StoreQuery {
    pub category: Option<String>,
    pub verified_only: bool,
    pub max_distance_km: Option<f64>,
    pub sort: StoreSort,
}

impl StoreQuery {
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn verified(mut self) -> Self {
        self.verified_only = true;
        self
    }

    pub fn within_km(mut self, km: f64) -> Self {
        self.max_distance_km = Some(km);
        self
    }

    pub fn sorted_by(mut self, sort: StoreSort) -> Self {
        self.sort = sort;
        self
    }

    fn matches(&self, store: &Store) -> bool {
        self.category.as_deref().map_or(true, |c| store.carries(c))
            && (!self.verified_only || store.is_verified)
            && self.max_distance_km.map_or(true, |max| store.distance <= max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceComparisonRow {
    pub store: Store,
    pub price: Money,
    pub in_stock: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceSort {
    /// Cheapest first; equal prices go to the nearer store.
    #[default]
    Price,
    Distance,
    Rating,
}

impl PriceSort {
    fn apply(self, rows: &mut [PriceComparisonRow]) {
        let by_distance = |a: &PriceComparisonRow, b: &PriceComparisonRow| a.store.distance.total_cmp(&b.store.distance);
        match self {
            Self::Price => rows.sort_by(|a, b| match a.price.cmp(&b.price) {
                Ordering::Equal => by_distance(a, b),
                other => other,
            }),
            Self::Distance => rows.sort_by(by_distance),
            Self::Rating => rows.sort_by(|a, b| b.store.rating.total_cmp(&a.store.rating)),
        }
    }
}

// =============================================================================
// IN-MEMORY CATALOG
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
struct CatalogDocument {
    stores: Vec<Store>,
    products: Vec<Product>,
    #[serde(default)]
    listings: Vec<Listing>,
    #[serde(default)]
    deals: Vec<Deal>,
}

/// Catalog held entirely in memory, loaded from a JSON document.
#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    document: CatalogDocument,
}

impl InMemoryCatalog {
    /// The catalog shipped with the binary.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(raw)?;
        let catalog = Self { document };
        catalog.check_references()?;
        info!(
            stores = catalog.document.stores.len(),
            products = catalog.document.products.len(),
            listings = catalog.document.listings.len(),
            deals = catalog.document.deals.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    fn check_references(&self) -> Result<(), CatalogError> {
        let has_store = |id: &str| self.document.stores.iter().any(|s| s.id == id);
        let has_product = |id: &str| self.document.products.iter().any(|p| p.id == id);

        for listing in &self.document.listings {
            if !has_store(&listing.store_id) {
                return Err(CatalogError::DanglingReference {
                    kind: "listing for",
                    id: listing.product_id.clone(),
                    target: format!("store {}", listing.store_id),
                });
            }
            if !has_product(&listing.product_id) {
                return Err(CatalogError::DanglingReference {
                    kind: "listing at",
                    id: listing.store_id.clone(),
                    target: format!("product {}", listing.product_id),
                });
            }
        }
        for deal in &self.document.deals {
            if !has_store(&deal.store_id) {
                return Err(CatalogError::DanglingReference {
                    kind: "deal",
                    id: deal.id.clone(),
                    target: format!("store {}", deal.store_id),
                });
            }
        }
        Ok(())
    }
}

impl CatalogRepository for InMemoryCatalog {
    fn stores(&self) -> Vec<Store> {
        self.document.stores.clone()
    }

    fn products(&self) -> Vec<Product> {
        self.document.products.clone()
    }

    fn listings(&self) -> Vec<Listing> {
        self.document.listings.clone()
    }

    fn deals(&self) -> Vec<Deal> {
        self.document.deals.clone()
    }

    fn store(&self, id: &str) -> Option<Store> {
        self.document.stores.iter().find(|s| s.id == id).cloned()
    }

    fn product(&self, id: &str) -> Option<Product> {
        self.document.products.iter().find(|p| p.id == id).cloned()
    }
}
